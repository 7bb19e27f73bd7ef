//! Scripted generator for adapter tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use storylint_error::{GenerationError, GenerationErrorKind, StorylintResult};
use storylint_interface::{GenerationRequest, TextGenerator};

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Transport(String),
}

/// Replays scripted replies in order, repeating the last one once the
/// script runs out.
#[derive(Debug)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Reply>>,
    last: Mutex<Option<Reply>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(text: impl Into<String>) -> Self {
        Self::new(vec![Reply::Text(text.into())])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> StorylintResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = match self.replies.lock().pop_front() {
            Some(reply) => {
                *self.last.lock() = Some(reply.clone());
                reply
            }
            None => self
                .last
                .lock()
                .clone()
                .unwrap_or_else(|| Reply::Text(String::new())),
        };
        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Transport(message) => {
                Err(GenerationError::new(GenerationErrorKind::Transport(message)).into())
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}
