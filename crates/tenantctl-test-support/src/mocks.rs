//! In-memory stand-ins for the transport, prompt, and sleeper seams.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tenantctl_core::{
    ApiRequest, ApiResponse, CoreError, CoreResult, Method, Prompt, RestTransport, Sleeper,
    TransportError,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Transport answering from scripted responses and recording every request.
///
/// Responses queued for the same route are returned in order; the last one
/// keeps being returned once the queue is down to it. Unscripted routes fail
/// with a transport error so unexpected calls are visible.
#[derive(Debug, Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<ApiResponse>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    /// Transport with no scripted routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `method path`.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        lock(&self.routes)
            .entry((method, path.to_string()))
            .or_default()
            .push_back(ApiResponse::new(status, body));
        self
    }

    /// Every request received, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiRequest> {
        lock(&self.calls).clone()
    }

    /// Number of requests received for `method path`.
    #[must_use]
    pub fn count(&self, method: Method, path: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| call.method == method && call.path == path)
            .count()
    }

    /// Number of requests whose path starts with `prefix`, any method.
    #[must_use]
    pub fn count_prefix(&self, prefix: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| call.path.starts_with(prefix))
            .count()
    }

    /// `"METHOD path"` for every request, in order.
    #[must_use]
    pub fn call_lines(&self) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .map(|call| format!("{} {}", call.method, call.path))
            .collect()
    }
}

#[async_trait]
impl RestTransport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        lock(&self.calls).push(request.clone());
        let mut routes = lock(&self.routes);
        let queue = routes.get_mut(&(request.method, request.path.clone()));
        let response = queue.and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        });
        drop(routes);
        response.ok_or_else(|| TransportError::Request {
            method: request.method,
            path: request.path,
            source: "no response scripted for route".into(),
        })
    }
}

/// Prompt answering from a fixed script and recording the conversation.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    questions: Vec<String>,
    told: Vec<String>,
}

impl ScriptedPrompt {
    /// Prompt that answers with `answers` in order, then reports closed input.
    #[must_use]
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Questions asked so far.
    #[must_use]
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Informational lines shown so far.
    #[must_use]
    pub fn told(&self) -> &[String] {
        &self.told
    }
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn ask(&mut self, question: &str) -> CoreResult<String> {
        self.questions.push(question.to_string());
        self.answers
            .pop_front()
            .map(|answer| answer.trim().to_string())
            .ok_or_else(|| CoreError::PromptClosed {
                question: question.to_string(),
            })
    }

    fn tell(&mut self, message: &str) {
        self.told.push(message.to_string());
    }
}

/// Sleeper that returns immediately and records requested delays.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Sleeper with no recorded delays.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in order.
    #[must_use]
    pub fn delays(&self) -> Vec<Duration> {
        lock(&self.delays).clone()
    }

    /// Sum of all requested delays.
    #[must_use]
    pub fn total(&self) -> Duration {
        lock(&self.delays).iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        lock(&self.delays).push(duration);
    }
}
