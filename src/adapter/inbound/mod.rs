//! Inbound adapters (driving side): the HTTP service and the command line.

pub mod cli;
pub mod http;
