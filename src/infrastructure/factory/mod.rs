//! Factory modules for building infrastructure components.
//!
//! Provides factory functions that construct fully-configured infrastructure
//! components from application configuration.
//!
//! # Submodules
//!
//! - [`llm`] - LLM client construction
//! - [`persistence`] - Quota store construction

pub mod llm;
pub mod persistence;
