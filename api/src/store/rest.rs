use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use url::Url;

use super::RecordStore;
use crate::config::StoreConfig;
use crate::dataset::Dataset;
use crate::error::StoreError;
use crate::record::{decode_record, Category, Identity, NewRecord, SavedRecord};

const TABLE: &str = "chart_data";
const REST_PREFIX: &str = "rest/v1";

/// Ask for a single JSON object instead of an array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
/// Error code for "a single-row query matched zero rows".
const NO_ROWS_CODE: &str = "PGRST116";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Client for a PostgREST endpoint holding the `chart_data` table.
#[derive(Debug, Clone)]
pub struct RestStore {
    config: StoreConfig,
    http: reqwest::Client,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

#[derive(Debug, Serialize)]
struct PayloadPatch<'a> {
    data: &'a Dataset,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl RestStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn table_url(&self) -> Result<Url, StoreError> {
        if !self.config.is_configured() {
            return Err(StoreError::Unconfigured);
        }
        let raw = format!("{}/{REST_PREFIX}/{TABLE}", self.config.url);
        Url::parse(&raw).map_err(|err| StoreError::Transport(format!("invalid store URL `{raw}`: {err}")))
    }

    /// Table URL filtered by equality on both key columns.
    fn keyed_url(&self, identity: &Identity, category: Category) -> Result<Url, StoreError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("email", &format!("eq.{}", identity.as_str()))
            .append_pair("chart_type", &format!("eq.{}", category.as_str()));
        Ok(url)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.config.anon_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.anon_key))
    }
}

impl RecordStore for RestStore {
    async fn fetch(
        &self,
        identity: &Identity,
        category: Category,
    ) -> Result<Option<SavedRecord>, StoreError> {
        let url = self.keyed_url(identity, category)?;
        debug!(%identity, %category, "fetching saved dataset");

        let response = self
            .authorized(self.http.get(url))
            .header(ACCEPT, SINGLE_OBJECT)
            .send()
            .await?;

        if !response.status().is_success() {
            let outcome = missing_as_none(error_from_response(response).await);
            match &outcome {
                Ok(_) => debug!(%identity, %category, "no saved dataset"),
                Err(err) => warn!(%identity, error = %err, "fetch failed"),
            }
            return outcome;
        }

        let row: Value = response.json().await?;
        decode_record(row).map(Some)
    }

    async fn insert(&self, record: NewRecord) -> Result<SavedRecord, StoreError> {
        let url = self.table_url()?;
        info!(identity = %record.identity, category = %record.category, "inserting dataset");

        let response = self
            .authorized(self.http.post(url))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&[&record])
            .send()
            .await?;

        first_row(response)
            .await?
            .ok_or_else(|| StoreError::Decode("insert returned no rows".into()))
    }

    async fn update(
        &self,
        identity: &Identity,
        category: Category,
        payload: &Dataset,
        updated_at: OffsetDateTime,
    ) -> Result<SavedRecord, StoreError> {
        let url = self.keyed_url(identity, category)?;
        info!(%identity, %category, "updating dataset");

        let response = self
            .authorized(self.http.patch(url))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&PayloadPatch {
                data: payload,
                updated_at,
            })
            .send()
            .await?;

        first_row(response).await?.ok_or_else(|| StoreError::Missing {
            identity: identity.to_string(),
            category: category.to_string(),
        })
    }
}

/// Decode the first row of a `return=representation` response.
async fn first_row(response: Response) -> Result<Option<SavedRecord>, StoreError> {
    if !response.status().is_success() {
        let err = error_from_response(response).await;
        warn!(error = %err, "write failed");
        return Err(err);
    }
    let rows: Vec<Value> = response.json().await?;
    rows.into_iter().next().map(decode_record).transpose()
}

/// A single-object fetch that matched zero rows is an empty result, not a
/// failure. Every other error passes through.
fn missing_as_none(err: StoreError) -> Result<Option<SavedRecord>, StoreError> {
    match err {
        StoreError::Api {
            code: Some(ref code),
            ..
        } if code == NO_ROWS_CODE => Ok(None),
        err => Err(err),
    }
}

async fn error_from_response(response: Response) -> StoreError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error_from_body(status.as_u16(), status.canonical_reason(), &body)
}

/// Map a non-success response to a store error, keeping the store's own
/// message when it sent one.
fn error_from_body(status: u16, reason: Option<&str>, body: &str) -> StoreError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.details)
        .filter(|message| !message.trim().is_empty())
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty() && !trimmed.starts_with('{')).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| match reason {
            Some(reason) => format!("Store request failed ({status} {reason})"),
            None => format!("Store request failed ({status})"),
        });

    StoreError::Api {
        status,
        code: parsed.code,
        message,
    }
}
