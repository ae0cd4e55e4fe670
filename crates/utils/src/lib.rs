//! Small stateless helpers shared across services
//!
//! Hex encoding, string predicates, date formatting, JSON conversion, file
//! housekeeping, zip archives and a multi-value map. Everything here is a
//! free function or a small value type; the only global state is the
//! read-once [`UtilsConfig`](commonutil_core::UtilsConfig).

pub mod archive;
pub mod collection;
pub mod date;
pub mod file;
pub mod hex;
pub mod json;
pub mod logging;
pub mod string;

pub use collection::MultiValueMap;
pub use commonutil_core::{Error, Result, ResultExt, UtilsConfig};
pub use json::{JsonParser, JsonParserBuilder};
