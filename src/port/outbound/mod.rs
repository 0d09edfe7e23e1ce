//! Outbound ports (driven side): interfaces implemented by outbound adapters.

pub mod clock;
pub mod llm;
pub mod quota;

pub use clock::{Clock, SystemClock};
pub use llm::Llm;
pub use quota::QuotaStore;
