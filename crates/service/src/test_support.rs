//! Scripted in-memory backend for exercising pages without HTTP.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use ecco_view_client::{ApiError, EccoApi, Method};
use serde_json::Value;

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Fail(u16, String),
}

#[derive(Debug, Clone)]
struct Scripted {
    delay: Duration,
    reply: Reply,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// Replies are queued per route; the last queued reply repeats.
#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    routes: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, path: &str, delay: Duration, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(Scripted { delay, reply });
    }

    pub(crate) fn ok(&self, method: Method, path: &str, value: Value) -> &Self {
        self.push(method, path, Duration::ZERO, Reply::Json(value));
        self
    }

    pub(crate) fn ok_after(&self, method: Method, path: &str, delay: Duration, value: Value) -> &Self {
        self.push(method, path, delay, Reply::Json(value));
        self
    }

    pub(crate) fn fail(&self, method: Method, path: &str, code: u16, message: &str) -> &Self {
        self.push(method, path, Duration::ZERO, Reply::Fail(code, message.to_owned()));
        self
    }

    pub(crate) fn fail_after(&self, method: Method, path: &str, delay: Duration, code: u16) -> &Self {
        self.push(method, path, delay, Reply::Fail(code, format!("API Error: {code}")));
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn calls_to(&self, method: Method) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.method == method).collect()
    }

    fn next(&self, method: Method, path: &str) -> Option<Scripted> {
        let mut routes = self.routes.lock().unwrap();
        let queue = routes.get_mut(&(method, path.to_owned()))?;
        if queue.len() > 1 { queue.pop_front() } else { queue.front().cloned() }
    }
}

#[async_trait]
impl EccoApi for FakeApi {
    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(Call { method, path: path.to_owned(), body });
        let Some(scripted) = self.next(method, path) else {
            return Err(ApiError::Status { code: 404, message: format!("no route for {method} {path}") });
        };
        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }
        match scripted.reply {
            Reply::Json(value) => Ok(value),
            Reply::Fail(code, message) => Err(ApiError::Status { code, message }),
        }
    }
}
