use std::time::Duration;

use async_trait::async_trait;
use procura_core::{HTTP_TIMEOUT_SECS, Partition, Record};
use url::Url;

use crate::{RecordSource, TransportError, WriteEndpoint};

/// Client for the spreadsheet read/write API.
#[derive(Debug, Clone)]
pub struct SheetClient {
    client: reqwest::Client,
    base_url: Url,
}

impl SheetClient {
    /// Creates a client against the given endpoint URL.
    ///
    /// # Errors
    /// Returns [`TransportError::Config`] if the URL does not parse and
    /// [`TransportError::ClientInit`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| TransportError::Config(format!("invalid API url {base_url:?}: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| TransportError::ClientInit(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    /// Creates a client from the `PROCURA_API_URL` environment variable.
    ///
    /// # Errors
    /// Returns [`TransportError::Config`] when the variable is unset or
    /// does not hold an absolute URL. Misconfiguration fails fast; there is
    /// nothing to retry.
    pub fn from_env() -> Result<Self, TransportError> {
        let raw = std::env::var("PROCURA_API_URL").map_err(|_| {
            TransportError::Config("PROCURA_API_URL environment variable must be set".to_owned())
        })?;
        Self::new(&raw)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // The legacy endpoint addresses the main sheet as the empty string.
    fn sheet_param(partition: &Partition) -> &str {
        if partition.is_main() { "" } else { partition.as_str() }
    }
}

#[async_trait]
impl RecordSource for SheetClient {
    async fn fetch(&self, partition: &Partition) -> Result<Vec<Record>, TransportError> {
        let response = self
            .client
            .get(self.base_url.clone())
            .query(&[("action", "read"), ("sheet", Self::sheet_param(partition))])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "could not read error body".to_owned());
            return Err(TransportError::HttpStatus { code: status.as_u16(), body });
        }

        let body = response.text().await?;
        let records: Vec<Record> =
            serde_json::from_str(&body).map_err(|e| TransportError::JsonParse {
                context: format!(
                    "read response for partition {partition} (body: {})",
                    truncate(&body, 200)
                ),
                source: e,
            })?;
        tracing::debug!(partition = %partition, count = records.len(), "fetched records");
        Ok(records)
    }
}

#[async_trait]
impl WriteEndpoint for SheetClient {
    async fn post(&self, form: &[(String, String)]) -> Result<(), TransportError> {
        let response = self.client.post(self.base_url.clone()).form(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "could not read error body".to_owned());
            return Err(TransportError::HttpStatus { code: status.as_u16(), body });
        }
        tracing::debug!(fields = form.len(), "mutation accepted");
        Ok(())
    }
}

/// Truncates a string to the given maximum length at a char boundary.
fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        s.get(..end).unwrap_or("")
    }
}
