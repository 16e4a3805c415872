use thiserror::Error;

#[derive(Error, Debug)]
pub enum MensaError {
    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned {status} for {url}")]
    Http {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Failed to parse JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response is missing the {0} header")]
    MissingHeader(&'static str),

    #[error("Invalid {name} header value: {value:?}")]
    InvalidHeader { name: &'static str, value: String },

    #[error("Incomplete canteen listing: page {0} never arrived")]
    MissingPage(u32),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Page task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl MensaError {
    /// True when the upstream API had no data for the request.
    pub fn is_not_found(&self) -> bool {
        match self {
            MensaError::NotFound(_) => true,
            MensaError::Http { status, .. } => *status == reqwest::StatusCode::NOT_FOUND,
            _ => false,
        }
    }

    /// True for failures that mean the body could not be understood.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            MensaError::Decode(_)
                | MensaError::MissingHeader(_)
                | MensaError::InvalidHeader { .. }
                | MensaError::MissingPage(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MensaError>;
