/// Custom error type for the sengi library
///
/// One flat enum for the whole crate. Using `thiserror` for automatic
/// `Error` trait implementation and `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum SengiError {
    /// Database-related errors (SQLite)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O errors (file reads, archive writes)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed descriptor XML
    #[error("XML error: {0}")]
    Xml(String),

    /// Descriptor is missing a required element
    #[error("descriptor is missing required element <{0}>")]
    MissingField(&'static str),

    /// An engine with the same name is already registered
    #[error("an engine named '{0}' is already registered")]
    DuplicateEngine(String),

    /// Engine registration rejected (bad URL template, empty name, ...)
    #[error("registration error: {0}")]
    Registry(String),

    /// Engine not found in the registry
    #[error("no engine named '{0}' in the registry")]
    EngineNotFound(String),

    /// Descriptor serialization errors
    #[error("serialize error: {0}")]
    Serialize(String),

    /// Zip archive errors
    #[error("archive error: {0}")]
    Archive(String),

    /// Filename template resolution errors
    #[error("invalid filename template '{0}'")]
    Template(String),

    /// HTML parsing errors (descriptor discovery)
    #[error("HTML parse error: {0}")]
    Html(String),

    /// Interactive picker errors
    #[error("picker error: {0}")]
    Picker(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// YAML parsing/serialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// JSON errors (stored descriptor params)
    #[error("JSON error: {0}")]
    Json(String),

    /// Generic error for cases that don't fit other categories
    #[error("{0}")]
    Other(String),
}

/// Result type alias using SengiError
pub type Result<T> = std::result::Result<T, SengiError>;

impl From<String> for SengiError {
    fn from(s: String) -> Self {
        SengiError::Other(s)
    }
}

impl From<&str> for SengiError {
    fn from(s: &str) -> Self {
        SengiError::Other(s.to_string())
    }
}

impl From<quick_xml::Error> for SengiError {
    fn from(err: quick_xml::Error) -> Self {
        SengiError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for SengiError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        SengiError::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for SengiError {
    fn from(err: zip::result::ZipError) -> Self {
        SengiError::Archive(err.to_string())
    }
}

impl From<serde_yaml::Error> for SengiError {
    fn from(err: serde_yaml::Error) -> Self {
        SengiError::Yaml(err.to_string())
    }
}

impl From<serde_json::Error> for SengiError {
    fn from(err: serde_json::Error) -> Self {
        SengiError::Json(err.to_string())
    }
}

impl From<tl::ParseError> for SengiError {
    fn from(err: tl::ParseError) -> Self {
        SengiError::Html(err.to_string())
    }
}

// Note: nucleo_picker::error::PickError is mapped manually in picker.rs
