use std::path::PathBuf;

/// Result type alias for commonutil operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for commonutil operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A character outside `0-9A-Fa-f` where a hex digit was expected
    #[error("invalid hex digit '{digit}'")]
    InvalidDigit { digit: char },

    /// A numeric argument or slice range outside its allowed bounds
    #[error("out of range: {message}")]
    OutOfRange { message: String },

    /// Regular expression compilation errors
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Date pattern contains a token that cannot be translated
    #[error("unsupported date pattern '{pattern}': {message}")]
    DateFormat { pattern: String, message: String },

    /// Date/time text that does not match its pattern
    #[error("failed to parse '{input}' with pattern '{pattern}': {message}")]
    DateParse {
        input: String,
        pattern: String,
        message: String,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Path has no file component, or names nothing on disk
    #[error("file not found at '{path}', please provide filepath along with filename")]
    FileNotFound { path: PathBuf },

    #[error("'{path}' is not a directory")]
    NotADirectory { path: PathBuf },

    /// URL that cannot be turned into a local file path
    #[error("invalid file URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// Zip archive creation or extraction errors
    #[error("archive {operation} failed for '{path}': {message}")]
    Archive {
        path: PathBuf,
        operation: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Another error with a caller-supplied explanation attached
    #[error("{message}: {source}")]
    Context {
        message: String,
        #[source]
        source: Box<Error>,
    },
}

// Conversion implementations
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::FileSystem {
            path: PathBuf::new(),
            operation: "unknown".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: error,
        }
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create an invalid hex digit error
    #[must_use]
    pub fn invalid_digit(digit: char) -> Self {
        Error::InvalidDigit { digit }
    }

    /// Create an out-of-range error
    #[must_use]
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Error::OutOfRange {
            message: message.into(),
        }
    }

    /// Create an invalid regex pattern error
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported date pattern error
    #[must_use]
    pub fn date_format(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Error::DateFormat {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a date parse error
    #[must_use]
    pub fn date_parse(
        input: impl Into<String>,
        pattern: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::DateParse {
            input: input.into(),
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    #[must_use]
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Error::FileNotFound { path: path.into() }
    }

    #[must_use]
    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        Error::NotADirectory { path: path.into() }
    }

    /// Create an invalid URL error
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an archive error
    #[must_use]
    pub fn archive(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Archive {
            path: path.into(),
            operation: operation.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create an archive error with a source error
    #[must_use]
    pub fn archive_with_source(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Error::Archive {
            path: path.into(),
            operation: operation.into(),
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// The innermost error, looking through any `Context` layers
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to a Result
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a lazy message
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Context {
            message: message.into(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| Error::Context {
            message: f(),
            source: Box::new(e.into()),
        })
    }
}
