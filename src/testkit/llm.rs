//! Scripted LLM doubles.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::port::outbound::Llm;

/// LLM that always returns the same text and records the prompts it saw.
#[derive(Debug, Default)]
pub struct StubLlm {
    response: String,
    prompts: Mutex<Vec<String>>,
}

impl StubLlm {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Stub whose response is the JSON encoding of `value`.
    pub fn json(value: &serde_json::Value) -> Self {
        Self::new(value.to_string())
    }

    /// Number of completion calls made.
    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Prompt sent on the most recent call.
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().last().cloned()
    }
}

#[async_trait]
impl Llm for StubLlm {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        Ok(self.response.clone())
    }
}

/// LLM that returns scripted responses in order, repeating the last one.
#[derive(Debug)]
pub struct SequenceLlm {
    responses: Vec<String>,
    next: AtomicUsize,
}

impl SequenceLlm {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            next: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Llm for SequenceLlm {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn model(&self) -> &str {
        "sequence-model"
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(index.min(self.responses.len().saturating_sub(1)))
            .cloned()
            .ok_or_else(|| Error::Connection("no scripted responses".into()))
    }
}

/// LLM whose every call fails at the transport level.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingLlm;

#[async_trait]
impl Llm for FailingLlm {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn model(&self) -> &str {
        "failing-model"
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(Error::Connection("503 Service Unavailable".into()))
    }
}

/// LLM that sleeps before answering, for timeout tests.
#[derive(Debug)]
pub struct SlowLlm {
    pub delay: Duration,
    pub response: String,
}

#[async_trait]
impl Llm for SlowLlm {
    fn name(&self) -> &'static str {
        "slow"
    }

    fn model(&self) -> &str {
        "slow-model"
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        tokio::time::sleep(self.delay).await;
        Ok(self.response.clone())
    }
}
