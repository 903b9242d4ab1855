//! Error types for the Debo bots.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Google service-account auth errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Service account key rejected: {0}")]
    InvalidKey(String),

    #[error("Failed to sign assertion: {0}")]
    Signing(String),

    #[error("Token exchange failed with status {status}: {body}")]
    TokenExchange { status: u16, body: String },

    #[error("Malformed token response: {0}")]
    MalformedResponse(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

/// Spreadsheet store errors.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Sheets API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed Sheets response: {0}")]
    MalformedResponse(String),

    #[error("Row {0} does not exist")]
    RowNotFound(u32),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

impl SheetError {
    /// True for failures of the connection itself rather than the API.
    pub fn is_network(&self) -> bool {
        matches!(self, SheetError::Http(_))
    }
}

/// Object-storage upload errors.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Upload API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Upload session missing resumable location header")]
    MissingLocation,

    #[error("Malformed upload response: {0}")]
    MalformedResponse(String),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

/// Messaging transport errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Bot API error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("Malformed Bot API response: {0}")]
    MalformedResponse(String),

    #[error("File {file_id} has no download path")]
    NoFilePath { file_id: String },
}

impl TransportError {
    /// True for failures of the connection itself rather than the API.
    pub fn is_network(&self) -> bool {
        matches!(self, TransportError::Http(_))
    }
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
