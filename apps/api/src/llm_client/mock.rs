//! Scripted generation client for unit and router tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{GenerationClient, InstructionPayload, LlmError};

pub struct MockGenerationClient {
    scripted: Mutex<VecDeque<Result<String, LlmError>>>,
    fallback: Option<String>,
    delay: Option<Duration>,
    call_count: AtomicUsize,
    payloads: Mutex<Vec<InstructionPayload>>,
}

impl MockGenerationClient {
    /// Replays `responses` in order, then fails with `EmptyResponse`.
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            scripted: Mutex::new(responses.into()),
            fallback: None,
            delay: None,
            call_count: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        }
    }

    /// Answers every call with the same text.
    pub fn always(text: &str) -> Self {
        Self {
            fallback: Some(text.to_string()),
            ..Self::new(Vec::new())
        }
    }

    /// Holds each call open for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<InstructionPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn generate(&self, payload: &InstructionPayload) -> Result<String, LlmError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(payload.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.scripted.lock().unwrap().pop_front();
        match (next, &self.fallback) {
            (Some(response), _) => response,
            (None, Some(text)) => Ok(text.clone()),
            (None, None) => Err(LlmError::EmptyResponse),
        }
    }
}
