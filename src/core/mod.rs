//! Core types shared by every layer of the cascade.
//!
//! # Error Handling
//! - [`Error`]: crate-level error wrapping the loader, graph and routing
//!   errors with proper error chains
//! - [`Result<T>`]: type alias for Results using [`Error`]
//!
//! # Configuration
//! - [`CascadeConfig`]: sediment toggle, parameter source, output naming
//! - [`SedimentParamMode`]: per-subbasin file or manual global values
//!
//! # Reporting Rules
//! - [`round2`], [`whole_volume`]: how computed values are rounded for output

mod config;
mod error;
mod numeric;

pub use config::{
    parse_manual_density, parse_manual_efficiency, CascadeConfig, SedimentParamMode,
    DEFAULT_OUTPUT_NAME, DEFAULT_SENTINEL, OUTPUT_EXTENSION,
};
pub use error::{Error, Result};
pub use numeric::{round2, whole_volume};
