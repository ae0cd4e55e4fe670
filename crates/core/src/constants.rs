//! Constants used throughout the commonutil codebase

// Environment variable names
pub const COMMONUTIL_LOG_VAR: &str = "COMMONUTIL_LOG";
pub const COMMONUTIL_ZIP_BUFFER_SIZE_VAR: &str = "COMMONUTIL_ZIP_BUFFER_SIZE";
pub const COMMONUTIL_JSON_SKIP_NULLS_VAR: &str = "COMMONUTIL_JSON_SKIP_NULLS";

// Logging
pub const DEFAULT_LOG_FILTER: &str = "info";

// Archive copy buffer
pub const DEFAULT_ZIP_BUFFER_SIZE: usize = 2048;

// Date patterns (Java-style tokens)
pub const ISO_DATE_FMT: &str = "yyyy-MM-dd'T'HH:mm:ss.SSS'Z'";
pub const TIMESTAMP_FMT: &str = "yyyy-MM-dd'T'HH:mm:ss.SSS";
pub const DATE_FMT: &str = "yyyy-MM-dd";

// Entry name extension for archived streams
pub const STREAM_ENTRY_EXTENSION: &str = "txt";

// Messages logged alongside returned errors
pub const ERR_DIR_ZIP: &str = "Directory could not be zipped due to exception";
pub const ERR_FILE_ZIP: &str = "File could not be zipped due to exception";
pub const ERR_FILE_UNZIP: &str = "File could not be unzipped due to exception";
pub const ERR_JSON_WRITE: &str = "Exception converting object to JSON";
pub const ERR_JSON_READ: &str = "Exception converting JSON to object";
