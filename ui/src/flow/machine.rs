//! State machine behind the "Customize Data" modal.
//!
//! The machine is synchronous and owns no I/O. Operations that need the
//! store hand back a request carrying a [`Ticket`]; the caller performs the
//! call and feeds the outcome back with the same ticket. Outcomes whose
//! ticket is no longer pending (the modal was closed, or the user went back)
//! are dropped.

use std::collections::HashMap;

use api::{Category, Dataset, Identity, RateField, SavedRecord, StoreError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    /// Modal closed.
    Idle,
    /// Collecting an email.
    IdentityEntry,
    /// Waiting for the lookup.
    Resolving,
    /// Working copy shown in the editor.
    Editing,
    /// Waiting for the insert/update.
    Saving,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("please enter a valid email address")]
    InvalidEmail,
    #[error("{0}")]
    Store(String),
}

/// Identifies one in-flight store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub ticket: Ticket,
    pub identity: Identity,
    pub category: Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Insert,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub ticket: Ticket,
    pub identity: Identity,
    pub category: Category,
    pub payload: Dataset,
    pub kind: SaveKind,
}

/// What the dashboard adopts after a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub identity: Identity,
    pub dataset: Dataset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowMachine {
    stage: FlowStage,
    identity_input: String,
    identity: Option<Identity>,
    working: Dataset,
    /// Payload fetched for the current identity. `Some` drives both the
    /// restore action and the insert/update choice.
    prior: Option<Dataset>,
    error: Option<FlowError>,
    /// Text typed into a rate field that doesn't read back as the stored
    /// value (blank, non-numeric, out of range). Dropped by [`Self::settle`].
    drafts: HashMap<(usize, RateField), String>,
    pending: Option<Ticket>,
    issued: u64,
}

impl Default for FlowMachine {
    fn default() -> Self {
        Self {
            stage: FlowStage::Idle,
            identity_input: String::new(),
            identity: None,
            working: Dataset::default(),
            prior: None,
            error: None,
            drafts: HashMap::new(),
            pending: None,
            issued: 0,
        }
    }
}

impl FlowMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// A machine that starts out collecting an email.
    pub fn opened() -> Self {
        let mut machine = Self::new();
        machine.open();
        machine
    }

    pub fn stage(&self) -> FlowStage {
        self.stage
    }

    pub fn identity_input(&self) -> &str {
        &self.identity_input
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn working(&self) -> &Dataset {
        &self.working
    }

    pub fn has_prior_data(&self) -> bool {
        self.prior.is_some()
    }

    pub fn error(&self) -> Option<&FlowError> {
        self.error.as_ref()
    }

    /// True while a store call is outstanding; the UI disables its controls.
    pub fn is_busy(&self) -> bool {
        matches!(self.stage, FlowStage::Resolving | FlowStage::Saving)
    }

    pub fn open(&mut self) {
        if self.stage == FlowStage::Idle {
            self.clear_transient();
            self.stage = FlowStage::IdentityEntry;
        }
    }

    pub fn set_identity_input(&mut self, value: impl Into<String>) {
        if self.stage == FlowStage::IdentityEntry {
            self.identity_input = value.into();
        }
    }

    /// Validate the typed email and, if it looks like one, start the lookup.
    /// Invalid input never produces a request.
    pub fn submit_identity(&mut self) -> Option<ResolveRequest> {
        if self.stage != FlowStage::IdentityEntry {
            return None;
        }
        self.error = None;

        let identity = match Identity::parse(&self.identity_input) {
            Ok(identity) => identity,
            Err(err) => {
                debug!(%err, "rejected email input");
                self.error = Some(FlowError::InvalidEmail);
                return None;
            }
        };

        let ticket = self.issue_ticket();
        self.identity = Some(identity.clone());
        self.stage = FlowStage::Resolving;
        Some(ResolveRequest {
            ticket,
            identity,
            category: Category::CallSuccess,
        })
    }

    /// Seed the working copy from the stored payload, or from the default
    /// dataset when nothing was saved yet.
    pub fn resolve_succeeded(&mut self, ticket: Ticket, record: Option<SavedRecord>) -> bool {
        if !self.accepts(ticket, FlowStage::Resolving) {
            return false;
        }
        self.pending = None;
        match record {
            Some(record) => {
                self.working = record.payload.clone();
                self.prior = Some(record.payload);
            }
            None => {
                self.working = Dataset::default();
                self.prior = None;
            }
        }
        self.stage = FlowStage::Editing;
        true
    }

    pub fn resolve_failed(&mut self, ticket: Ticket, message: impl Into<String>) -> bool {
        if !self.accepts(ticket, FlowStage::Resolving) {
            return false;
        }
        self.pending = None;
        self.identity = None;
        self.error = Some(FlowError::Store(message.into()));
        self.stage = FlowStage::IdentityEntry;
        true
    }

    pub fn finish_resolve(
        &mut self,
        ticket: Ticket,
        result: Result<Option<SavedRecord>, StoreError>,
    ) -> bool {
        match result {
            Ok(record) => self.resolve_succeeded(ticket, record),
            Err(err) => self.resolve_failed(ticket, err.to_string()),
        }
    }

    /// Overwrite one rate of the working copy from raw form input.
    ///
    /// Input that isn't an integer is ignored; integers are clamped to
    /// 0..=100. Text that doesn't match the stored value is kept as a draft
    /// for display until [`Self::settle`]. Returns whether the working copy
    /// changed.
    pub fn edit(&mut self, index: usize, field: RateField, raw: &str) -> bool {
        if self.stage != FlowStage::Editing {
            return false;
        }
        let Some(before) = self.working.get(index).map(|entry| entry.rate(field)) else {
            return false;
        };
        let changed = match raw.trim().parse::<i64>() {
            Ok(value) => {
                let clamped = value.clamp(0, i64::from(api::dataset::MAX_RATE)) as u8;
                clamped != before && self.working.set_rate(index, field, clamped).is_ok()
            }
            Err(_) => false,
        };

        let stored = self.rate_text(index, field);
        if raw.trim() == stored {
            self.drafts.remove(&(index, field));
        } else {
            self.drafts.insert((index, field), raw.to_string());
        }
        changed
    }

    /// What a rate input should show: the draft being typed, or the stored
    /// value.
    pub fn field_text(&self, index: usize, field: RateField) -> String {
        self.drafts
            .get(&(index, field))
            .cloned()
            .unwrap_or_else(|| self.rate_text(index, field))
    }

    /// Drop drafts so every input shows the value that will be saved.
    pub fn settle(&mut self) {
        self.drafts.clear();
    }

    /// Throw away edits and go back to the fetched payload.
    pub fn restore_previous(&mut self) -> bool {
        if self.stage != FlowStage::Editing {
            return false;
        }
        match &self.prior {
            Some(prior) => {
                self.working = prior.clone();
                self.drafts.clear();
                true
            }
            None => false,
        }
    }

    pub fn submit_save(&mut self) -> Option<SaveRequest> {
        if self.stage != FlowStage::Editing {
            return None;
        }
        let identity = self.identity.clone()?;
        self.error = None;
        self.drafts.clear();

        let kind = if self.prior.is_some() {
            SaveKind::Update
        } else {
            SaveKind::Insert
        };
        let ticket = self.issue_ticket();
        self.stage = FlowStage::Saving;
        Some(SaveRequest {
            ticket,
            identity,
            category: Category::CallSuccess,
            payload: self.working.clone(),
            kind,
        })
    }

    /// Hand the saved dataset to the caller and close.
    pub fn save_succeeded(&mut self, ticket: Ticket) -> Option<SaveOutcome> {
        if !self.accepts(ticket, FlowStage::Saving) {
            return None;
        }
        let identity = self.identity.take()?;
        let dataset = std::mem::take(&mut self.working);
        self.close();
        Some(SaveOutcome { identity, dataset })
    }

    /// Stay in the editor with the attempted data untouched.
    pub fn save_failed(&mut self, ticket: Ticket, message: impl Into<String>) -> bool {
        if !self.accepts(ticket, FlowStage::Saving) {
            return false;
        }
        self.pending = None;
        self.error = Some(FlowError::Store(message.into()));
        self.stage = FlowStage::Editing;
        true
    }

    pub fn finish_save<T>(&mut self, ticket: Ticket, result: Result<T, StoreError>) -> Option<SaveOutcome> {
        match result {
            Ok(_) => self.save_succeeded(ticket),
            Err(err) => {
                self.save_failed(ticket, err.to_string());
                None
            }
        }
    }

    /// Return to the email form, keeping what was typed.
    pub fn back(&mut self) -> bool {
        if self.stage != FlowStage::Editing {
            return false;
        }
        self.identity = None;
        self.working = Dataset::default();
        self.prior = None;
        self.error = None;
        self.drafts.clear();
        self.pending = None;
        self.stage = FlowStage::IdentityEntry;
        true
    }

    /// Close from any stage without persisting anything.
    pub fn close(&mut self) {
        self.clear_transient();
        self.stage = FlowStage::Idle;
    }

    fn clear_transient(&mut self) {
        self.identity_input.clear();
        self.identity = None;
        self.working = Dataset::default();
        self.prior = None;
        self.error = None;
        self.drafts.clear();
        self.pending = None;
    }

    fn rate_text(&self, index: usize, field: RateField) -> String {
        self.working
            .get(index)
            .map(|entry| entry.rate(field).to_string())
            .unwrap_or_default()
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.pending = Some(ticket);
        ticket
    }

    fn accepts(&self, ticket: Ticket, stage: FlowStage) -> bool {
        let accepted = self.stage == stage && self.pending == Some(ticket);
        if !accepted {
            debug!(?ticket, stage = ?self.stage, "ignoring stale store response");
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn record(payload: Dataset) -> SavedRecord {
        let now = OffsetDateTime::now_utc();
        SavedRecord {
            id: Some("1".into()),
            identity: Identity::parse("a@b.com").unwrap(),
            category: Category::CallSuccess,
            payload,
            created_at: now,
            updated_at: now,
        }
    }

    fn custom_payload() -> Dataset {
        let mut payload = Dataset::default();
        payload.set_rate(0, RateField::Success, 70).unwrap();
        payload.set_rate(0, RateField::Failure, 30).unwrap();
        payload
    }

    fn editing(prior: Option<Dataset>) -> FlowMachine {
        let mut machine = FlowMachine::opened();
        machine.set_identity_input("a@b.com");
        let request = machine.submit_identity().unwrap();
        assert!(machine.resolve_succeeded(request.ticket, prior.map(record)));
        machine
    }

    #[test]
    fn opened_machine_waits_for_an_email() {
        let machine = FlowMachine::opened();
        assert_eq!(machine.stage(), FlowStage::IdentityEntry);
        assert!(!machine.is_busy());
        assert!(FlowMachine::new().stage() == FlowStage::Idle);
    }

    #[test]
    fn input_without_at_sign_never_produces_a_request() {
        for input in ["", "   ", "someone", "someone.example.com"] {
            let mut machine = FlowMachine::opened();
            machine.set_identity_input(input);
            assert!(machine.submit_identity().is_none());
            assert_eq!(machine.stage(), FlowStage::IdentityEntry);
            assert_eq!(machine.error(), Some(&FlowError::InvalidEmail));
        }
    }

    #[test]
    fn valid_email_starts_resolving() {
        let mut machine = FlowMachine::opened();
        machine.set_identity_input("a@b.com");
        let request = machine.submit_identity().unwrap();
        assert_eq!(request.identity.as_str(), "a@b.com");
        assert_eq!(request.category, Category::CallSuccess);
        assert_eq!(machine.stage(), FlowStage::Resolving);
        assert!(machine.is_busy());
        assert!(machine.submit_identity().is_none());
    }

    #[test]
    fn no_record_seeds_default_dataset() {
        let machine = editing(None);
        assert_eq!(machine.stage(), FlowStage::Editing);
        assert_eq!(machine.working(), &Dataset::default());
        assert!(!machine.has_prior_data());
    }

    #[test]
    fn existing_record_seeds_payload_and_restore_discards_edits() {
        let mut machine = editing(Some(custom_payload()));
        assert!(machine.has_prior_data());
        assert_eq!(machine.working(), &custom_payload());

        assert!(machine.edit(0, RateField::Success, "10"));
        assert!(machine.edit(5, RateField::Failure, "44"));
        assert_ne!(machine.working(), &custom_payload());

        assert!(machine.restore_previous());
        assert_eq!(machine.working(), &custom_payload());
    }

    #[test]
    fn restore_without_prior_data_is_a_no_op() {
        let mut machine = editing(None);
        machine.edit(0, RateField::Success, "10");
        assert!(!machine.restore_previous());
        assert_eq!(machine.working().get(0).unwrap().success_rate, 10);
    }

    #[test]
    fn edits_ignore_garbage_and_clamp_numbers() {
        let mut machine = editing(None);
        assert!(!machine.edit(0, RateField::Success, "abc"));
        assert!(!machine.edit(0, RateField::Success, ""));
        assert!(!machine.edit(99, RateField::Success, "50"));
        assert!(machine.edit(0, RateField::Success, "250"));
        assert_eq!(machine.working().get(0).unwrap().success_rate, 100);
        assert!(machine.edit(0, RateField::Failure, "-4"));
        assert_eq!(machine.working().get(0).unwrap().failure_rate, 0);
    }

    #[test]
    fn cleared_field_shows_its_draft_until_settled() {
        let mut machine = editing(None);
        let stored = machine.working().get(0).unwrap().success_rate;

        assert!(!machine.edit(0, RateField::Success, ""));
        assert_eq!(machine.field_text(0, RateField::Success), "");
        assert_eq!(machine.working().get(0).unwrap().success_rate, stored);

        machine.settle();
        assert_eq!(machine.field_text(0, RateField::Success), stored.to_string());
    }

    #[test]
    fn clamped_input_reads_back_as_the_saved_value_once_settled() {
        let mut machine = editing(None);
        assert!(machine.edit(0, RateField::Success, "100"));
        assert!(!machine.edit(0, RateField::Success, "150"));
        assert_eq!(machine.field_text(0, RateField::Success), "150");

        let request = machine.submit_save().unwrap();
        assert_eq!(request.payload.get(0).unwrap().success_rate, 100);
        assert_eq!(machine.field_text(0, RateField::Success), "100");
    }

    #[test]
    fn matching_input_leaves_no_draft() {
        let mut machine = editing(None);
        assert!(machine.edit(2, RateField::Failure, "40"));
        assert_eq!(machine.field_text(2, RateField::Failure), "40");
        machine.edit(2, RateField::Failure, "x");
        assert_eq!(machine.field_text(2, RateField::Failure), "x");
        machine.edit(2, RateField::Failure, " 40 ");
        assert_eq!(machine.field_text(2, RateField::Failure), "40");
    }

    #[test]
    fn fetch_failure_returns_to_email_form_with_message() {
        let mut machine = FlowMachine::opened();
        machine.set_identity_input("a@b.com");
        let request = machine.submit_identity().unwrap();
        assert!(machine.finish_resolve(
            request.ticket,
            Err(StoreError::Transport("permission denied".into()))
        ));
        assert_eq!(machine.stage(), FlowStage::IdentityEntry);
        assert_eq!(
            machine.error(),
            Some(&FlowError::Store("permission denied".into()))
        );
        assert_eq!(machine.identity_input(), "a@b.com");
    }

    #[test]
    fn save_chooses_insert_or_update_from_prior_flag() {
        let mut fresh = editing(None);
        assert_eq!(fresh.submit_save().unwrap().kind, SaveKind::Insert);

        let mut returning = editing(Some(custom_payload()));
        assert_eq!(returning.submit_save().unwrap().kind, SaveKind::Update);
    }

    #[test]
    fn successful_save_hands_over_data_and_resets() {
        let mut machine = editing(None);
        machine.edit(0, RateField::Success, "50");
        let request = machine.submit_save().unwrap();
        assert_eq!(machine.stage(), FlowStage::Saving);

        let outcome = machine.save_succeeded(request.ticket).unwrap();
        assert_eq!(outcome.identity.as_str(), "a@b.com");
        assert_eq!(outcome.dataset.get(0).unwrap().success_rate, 50);

        assert_eq!(machine.stage(), FlowStage::Idle);
        assert_eq!(machine.identity_input(), "");
        assert!(machine.identity().is_none());
        assert!(!machine.has_prior_data());
        assert!(machine.error().is_none());
        assert_eq!(machine.working(), &Dataset::default());
    }

    #[test]
    fn failed_save_keeps_working_copy() {
        let mut machine = editing(None);
        machine.edit(2, RateField::Failure, "20");
        let attempted = machine.working().clone();
        let request = machine.submit_save().unwrap();

        let outcome = machine.finish_save::<()>(
            request.ticket,
            Err(StoreError::Transport("network unreachable".into())),
        );
        assert!(outcome.is_none());
        assert_eq!(machine.stage(), FlowStage::Editing);
        assert_eq!(machine.working(), &attempted);
        assert_eq!(
            machine.error().map(ToString::to_string).as_deref(),
            Some("network unreachable")
        );

        // retry goes through
        let retry = machine.submit_save().unwrap();
        assert!(machine.save_succeeded(retry.ticket).is_some());
    }

    #[test]
    fn back_keeps_typed_email_but_drops_fetched_state() {
        let mut machine = editing(Some(custom_payload()));
        machine.edit(0, RateField::Success, "1");
        assert!(machine.back());
        assert_eq!(machine.stage(), FlowStage::IdentityEntry);
        assert_eq!(machine.identity_input(), "a@b.com");
        assert!(!machine.has_prior_data());
        assert_eq!(machine.working(), &Dataset::default());
        assert!(machine.submit_identity().is_some());
    }

    #[test]
    fn close_from_any_stage_clears_everything() {
        let mut machine = editing(Some(custom_payload()));
        machine.close();
        assert_eq!(machine.stage(), FlowStage::Idle);
        assert_eq!(machine, {
            let mut fresh = FlowMachine::new();
            fresh.issued = machine.issued;
            fresh
        });
    }

    #[test]
    fn responses_after_close_are_ignored() {
        let mut machine = FlowMachine::opened();
        machine.set_identity_input("a@b.com");
        let request = machine.submit_identity().unwrap();
        machine.close();
        machine.open();

        assert!(!machine.resolve_succeeded(request.ticket, Some(record(custom_payload()))));
        assert_eq!(machine.stage(), FlowStage::IdentityEntry);
        assert!(!machine.has_prior_data());
    }

    #[test]
    fn stale_save_ticket_is_ignored() {
        let mut machine = editing(None);
        let first = machine.submit_save().unwrap();
        machine.save_failed(first.ticket, "boom");
        let second = machine.submit_save().unwrap();

        assert!(machine.save_succeeded(first.ticket).is_none());
        assert_eq!(machine.stage(), FlowStage::Saving);
        assert!(machine.save_succeeded(second.ticket).is_some());
    }
}
