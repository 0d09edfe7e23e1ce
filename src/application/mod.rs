//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

pub mod evaluator;
pub mod harness;
pub mod prompt;
pub mod quota;
pub mod request;
pub mod validation;

pub use evaluator::{ApiResponse, Evaluator};
pub use harness::{Dataset, Harness, HarnessReport, Metrics, SampleResult};
pub use quota::QuotaTracker;
pub use request::REQUIREMENT_FIELD;
pub use validation::{validate, ResponseValidator};
