//! The editable call-success series.
//!
//! A [`Dataset`] is an ordered, non-empty list of time buckets. Order is
//! chronological and preserved through every save and fetch. Each bucket
//! carries two percentages; they are range-checked but not required to add
//! up to 100 (see [`Dataset::unbalanced_entries`]).

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// Upper bound for both rates.
pub const MAX_RATE: u8 = 100;

/// One time bucket of the call-success series.
///
/// The wire names (`time`, `successRate`, `failureRate`) match the JSON
/// already stored by earlier versions of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetEntry {
    #[serde(rename = "time", alias = "label")]
    pub label: String,
    #[serde(rename = "successRate")]
    pub success_rate: u8,
    #[serde(rename = "failureRate")]
    pub failure_rate: u8,
}

impl DatasetEntry {
    pub fn new(label: impl Into<String>, success_rate: u8, failure_rate: u8) -> Self {
        Self {
            label: label.into(),
            success_rate,
            failure_rate,
        }
    }

    pub fn rate(&self, field: RateField) -> u8 {
        match field {
            RateField::Success => self.success_rate,
            RateField::Failure => self.failure_rate,
        }
    }

    /// True when success and failure do not sum to 100.
    pub fn is_unbalanced(&self) -> bool {
        u16::from(self.success_rate) + u16::from(self.failure_rate) != u16::from(MAX_RATE)
    }
}

/// Which of the two percentages an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateField {
    Success,
    Failure,
}

impl RateField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "successRate",
            Self::Failure => "failureRate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DatasetEntry>", into = "Vec<DatasetEntry>")]
pub struct Dataset(Vec<DatasetEntry>);

impl Dataset {
    /// The eight fixed buckets shown before anyone customizes the chart.
    pub fn call_success_default() -> Self {
        Self(vec![
            DatasetEntry::new("12:00 AM", 95, 5),
            DatasetEntry::new("3:00 AM", 92, 8),
            DatasetEntry::new("6:00 AM", 88, 12),
            DatasetEntry::new("9:00 AM", 94, 6),
            DatasetEntry::new("12:00 PM", 97, 3),
            DatasetEntry::new("3:00 PM", 96, 4),
            DatasetEntry::new("6:00 PM", 91, 9),
            DatasetEntry::new("9:00 PM", 93, 7),
        ])
    }

    pub fn entries(&self) -> &[DatasetEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed dataset; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DatasetEntry> {
        self.0.get(index)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|entry| entry.label.as_str())
    }

    pub fn series(&self, field: RateField) -> Vec<f64> {
        self.0
            .iter()
            .map(|entry| f64::from(entry.rate(field)))
            .collect()
    }

    /// Overwrite one rate in place.
    pub fn set_rate(&mut self, index: usize, field: RateField, value: u8) -> Result<(), DatasetError> {
        if value > MAX_RATE {
            return Err(DatasetError::RateOutOfRange {
                index,
                field: field.as_str(),
                value: u16::from(value),
            });
        }
        let len = self.0.len();
        let entry = self
            .0
            .get_mut(index)
            .ok_or(DatasetError::IndexOutOfBounds { index, len })?;
        match field {
            RateField::Success => entry.success_rate = value,
            RateField::Failure => entry.failure_rate = value,
        }
        Ok(())
    }

    /// Indices of buckets whose two rates don't add up to 100.
    pub fn unbalanced_entries(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_unbalanced())
            .map(|(index, _)| index)
            .collect()
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::call_success_default()
    }
}

impl TryFrom<Vec<DatasetEntry>> for Dataset {
    type Error = DatasetError;

    fn try_from(entries: Vec<DatasetEntry>) -> Result<Self, Self::Error> {
        if entries.is_empty() {
            return Err(DatasetError::Empty);
        }
        for (index, entry) in entries.iter().enumerate() {
            for field in [RateField::Success, RateField::Failure] {
                let value = entry.rate(field);
                if value > MAX_RATE {
                    return Err(DatasetError::RateOutOfRange {
                        index,
                        field: field.as_str(),
                        value: u16::from(value),
                    });
                }
            }
        }
        Ok(Self(entries))
    }
}

impl From<Dataset> for Vec<DatasetEntry> {
    fn from(dataset: Dataset) -> Self {
        dataset.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_has_eight_chronological_buckets() {
        let dataset = Dataset::default();
        assert_eq!(dataset.len(), 8);
        let labels: Vec<&str> = dataset.labels().collect();
        assert_eq!(labels.first(), Some(&"12:00 AM"));
        assert_eq!(labels.last(), Some(&"9:00 PM"));
        assert!(dataset.unbalanced_entries().is_empty());
    }

    #[test]
    fn decodes_stored_camel_case_payload() {
        let payload = json!([
            { "time": "12:00 AM", "successRate": 50, "failureRate": 50 },
            { "time": "3:00 AM", "successRate": 92, "failureRate": 8 }
        ]);
        let dataset: Dataset = serde_json::from_value(payload.clone()).unwrap();
        assert_eq!(dataset.get(0).unwrap().success_rate, 50);
        assert_eq!(serde_json::to_value(&dataset).unwrap(), payload);
    }

    #[test]
    fn rejects_empty_payload() {
        let err = serde_json::from_value::<Dataset>(json!([])).unwrap_err();
        assert!(err.to_string().contains("at least one"));
        assert_eq!(Dataset::try_from(Vec::new()), Err(DatasetError::Empty));
    }

    #[test]
    fn rejects_rates_above_one_hundred() {
        let entries = vec![DatasetEntry::new("12:00 AM", 101, 0)];
        assert!(matches!(
            Dataset::try_from(entries),
            Err(DatasetError::RateOutOfRange { index: 0, value: 101, .. })
        ));
    }

    #[test]
    fn rejects_missing_fields() {
        let payload = json!([{ "time": "12:00 AM", "successRate": 95 }]);
        assert!(serde_json::from_value::<Dataset>(payload).is_err());
    }

    #[test]
    fn set_rate_checks_index_and_range() {
        let mut dataset = Dataset::default();
        dataset.set_rate(0, RateField::Success, 50).unwrap();
        assert_eq!(dataset.get(0).unwrap().success_rate, 50);
        assert_eq!(dataset.unbalanced_entries(), vec![0]);

        assert!(matches!(
            dataset.set_rate(8, RateField::Failure, 10),
            Err(DatasetError::IndexOutOfBounds { index: 8, len: 8 })
        ));
        assert!(dataset.set_rate(1, RateField::Failure, 120).is_err());
        assert_eq!(dataset.get(1).unwrap().failure_rate, 8);
    }
}
