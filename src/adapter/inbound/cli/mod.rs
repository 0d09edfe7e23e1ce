//! CLI module graph.

pub mod command;
pub mod config;
pub mod evaluate;
pub mod harness;
pub mod output;
pub mod serve;
pub mod usage;
