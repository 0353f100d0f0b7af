use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Wallet provider unavailable")]
    WalletUnavailable,

    #[error("Wallet authorization denied")]
    AuthorizationDenied,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid review: {0}")]
    InvalidReview(String),

    #[error("Catalog fetch failed: {0}")]
    CatalogFetchFailed(String),

    #[error("Purchase aborted, spend approval failed: {0}")]
    PurchaseAborted(#[source] Box<CoreError>),

    #[error("Transaction rejected: {0}")]
    TransactionRejected(String),

    #[error("Unknown product index: {0}")]
    UnknownProduct(u64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialization(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("RPC error: {0}")]
    Rpc(String),
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CoreError {
    fn from(err: toml::ser::Error) -> Self {
        CoreError::TomlSerialization(err.to_string())
    }
}
