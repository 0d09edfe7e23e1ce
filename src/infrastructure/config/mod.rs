//! Infrastructure configuration modules.

pub mod input;
pub mod llm;
pub mod logging;
pub mod quota;
pub mod server;
pub mod settings;
