//! Core errors, constants and configuration for the `commonutil` workspace.
//!
//! ## Key Components
//!
//! - **`errors`**: The `Error` enum and `Result` alias shared by every helper,
//!   keeping "bad digit" apart from "bad range" and from I/O failures.
//! - **`config`**: `UtilsConfig`, the handful of runtime knobs the helpers read.
//! - **`constants`**: Environment variable names, default patterns and messages.

pub mod config;
pub mod constants;
pub mod errors;

pub use self::{
    config::UtilsConfig,
    constants::*,
    errors::{Error, Result, ResultExt},
};
