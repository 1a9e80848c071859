//! HTTP occupancy source.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{OccupancyReader, SourceError};
use crate::models::source::SourceConfig;

/// The JSON body a detector endpoint answers with.
#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u32,
}

/// Reads occupancy counts from detector sidecars over HTTP.
///
/// Expects `GET {source.url}` to answer `{"count": <n>}`. A gone endpoint
/// (404/410) is treated as end of stream; any other failure maps to the
/// transient [`SourceError::Unavailable`]. The underlying cause is logged at
/// debug level here since the driver already logs the skip itself.
pub struct HttpOccupancyReader {
    client: reqwest::Client,
}

impl HttpOccupancyReader {
    /// Creates a reader over a shared HTTP client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OccupancyReader for HttpOccupancyReader {
    async fn read(&self, source: &SourceConfig) -> Result<u32, SourceError> {
        let response = self.client.get(source.url.clone()).send().await.map_err(|e| {
            tracing::debug!(source = %source.id, error = %e, "Source request failed.");
            SourceError::Unavailable
        })?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND | StatusCode::GONE => return Err(SourceError::EndOfStream),
            status => {
                tracing::debug!(source = %source.id, %status, "Source answered with an error status.");
                return Err(SourceError::Unavailable);
            }
        }

        let body: CountResponse = response.json().await.map_err(|e| {
            tracing::debug!(source = %source.id, error = %e, "Source answered with an unparsable body.");
            SourceError::Unavailable
        })?;

        Ok(body.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_body_parses() {
        let body: CountResponse = serde_json::from_str(r#"{"count": 4}"#).unwrap();
        assert_eq!(body.count, 4);
    }

    #[test]
    fn negative_count_body_is_rejected() {
        let result: Result<CountResponse, _> = serde_json::from_str(r#"{"count": -1}"#);
        assert!(result.is_err());
    }
}
