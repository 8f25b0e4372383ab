//! # chatlens-core
//!
//! Core library for chatlens - statistics over group chat exports.
//!
//! This library provides:
//! - Domain types for the chat export format
//! - Loading and normalization of exported messages
//! - Aggregators for activity, rhythm, pauses, reactions and replies
//! - A report engine that runs the aggregators by name
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Pipeline
//!
//! - **Load:** the JSON export is parsed; malformed messages are skipped with a warning
//! - **Normalize:** each message gets a parsed instant and calendar day, without mutating it
//! - **Filter:** an optional date range and participant selection
//! - **Aggregate:** each report returns a plain serializable value
//!
//! ## Example
//!
//! ```rust,no_run
//! use chatlens_core::analytics::{create_default_engine, ReportContext};
//! use chatlens_core::{ingest, Config};
//! use std::path::Path;
//!
//! let config = Config::load().expect("failed to load config");
//! let parsed = ingest::load_chat(Path::new("result.json")).expect("failed to load export");
//! let messages = ingest::normalize_chat(&parsed.chat);
//!
//! let engine = create_default_engine();
//! let ctx = ReportContext::from_config(&config.analysis);
//! for run in engine.run_all(&messages, &ctx) {
//!     println!("{}: {}", run.name, run.status.as_str());
//! }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use ingest::{NormalizedMessage, ParseResult};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod types;
