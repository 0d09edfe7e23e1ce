//! reqeval - quota-guarded LLM evaluation of software requirements.
//!
//! A caller submits one requirement statement; the service charges the
//! caller's daily quota, asks a language model to score the statement for
//! ambiguity, testability and completeness, and returns the model's JSON.
//!
//! # Architecture
//!
//! The crate is laid out as ports and adapters:
//!
//! - [`domain`] - Quota records, the evaluation schema, caller identity
//! - [`port`] - Traits for the model, the quota store and the clock
//! - [`application`] - Quota tracking, response validation, the request
//!   pipeline and the offline accuracy harness
//! - [`adapter`] - HTTP and CLI front ends; Anthropic/OpenAI clients,
//!   SQLite and in-memory quota stores
//! - [`infrastructure`] - Configuration, factories and wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use reqeval::application::validate;
//!
//! let payload = serde_json::json!({ "testable": true });
//! assert!(validate(&payload).is_err());
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
