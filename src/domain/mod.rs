//! Transport-agnostic domain types: quota records, the evaluation schema and
//! caller identity.

pub mod client;
pub mod evaluation;
pub mod quota;
pub mod schema;

pub use client::resolve_client_key;
pub use evaluation::{fallback_payload, EvaluationPayload, PARSE_FAILURE_DETAIL};
pub use quota::{
    format_day, utc_today, ConditionalIncrement, QuotaDecision, QuotaRecord, UsageSnapshot,
    UNKNOWN_CLIENT,
};
pub use schema::{FieldKind, FieldSpec, EVALUATION_SCHEMA};
