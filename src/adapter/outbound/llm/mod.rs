//! LLM adapter modules.
//!
//! Provides implementations of the [`Llm`](crate::port::outbound::llm::Llm) trait
//! for Anthropic Claude and OpenAI. The provider follows from the configured
//! model id, see [`ModelFamily`].

pub mod anthropic;
pub mod family;
pub mod openai;

pub use anthropic::Anthropic;
pub use family::ModelFamily;
pub use openai::OpenAi;
