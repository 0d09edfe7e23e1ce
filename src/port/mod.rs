//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the request pipeline and the systems it talks
//! to: the inference provider, the durable quota store and the wall clock.
//!
//! ```text
//!                 ┌─────────────────────────┐
//!                 │       Application       │
//!                 │  (quota, validation,    │
//!                 │   evaluator, harness)   │
//!                 └────────────┬────────────┘
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//!    ┌───────────┐       ┌────────────┐      ┌───────────┐
//!    │    Llm    │       │ QuotaStore │      │   Clock   │
//!    │  Adapter  │       │  Adapter   │      │           │
//!    └───────────┘       └────────────┘      └───────────┘
//! ```

pub mod outbound;
