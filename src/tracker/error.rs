use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl TrackerError {
    /// HTTP status when the service answered with a non-success code.
    pub fn status(&self) -> Option<u16> {
        match self {
            TrackerError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
