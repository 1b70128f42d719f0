use thiserror::Error;

/// Failure talking to the exchange.
///
/// The synchronizers treat a 404 [`ExchangeError::Status`] as a defined
/// signal ("not created remotely yet"), every other variant as a retryable
/// sync error.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("error sending {method} {url} to the exchange: {source}")]
    Transport {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status} response code with body {body}")]
    Status { url: String, status: u16, body: String },

    #[error("could not encode exchange payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ExchangeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}
