use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToshokanError {
    #[error("config error: {0}")]
    Config(String),

    #[error("mapping lookup failed: {0}")]
    Mapping(String),

    #[error("metadata lookup failed: {0}")]
    Metadata(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
