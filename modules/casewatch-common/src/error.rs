use thiserror::Error;

#[derive(Error, Debug)]
pub enum CasewatchError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Notify error: {0}")]
    Notify(String),

    #[error("State store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl CasewatchError {
    /// Pipeline phase the error belongs to, for logs and the run log.
    pub fn phase(&self) -> &'static str {
        match self {
            CasewatchError::Fetch(_) => "fetch",
            CasewatchError::Parse(_) => "parse",
            CasewatchError::Notify(_) => "notify",
            CasewatchError::Store(_) => "store",
            CasewatchError::Config(_) => "config",
            CasewatchError::Anyhow(_) => "internal",
        }
    }
}
