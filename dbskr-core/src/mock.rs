//! In-memory [`Transport`] for tests

use crate::error::{BotListError, BotListResult};
use crate::transport::{ApiRequest, ApiResponse, Transport};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::mpsc;

/// Records every request and replays queued responses.
///
/// Queued responses are consumed first; once the queue is empty the
/// fallback response (if any) is returned for every further call.
#[derive(Debug, Default)]
pub struct MockTransport {
    queued: Mutex<VecDeque<BotListResult<ApiResponse>>>,
    fallback: Mutex<Option<ApiResponse>>,
    requests: Mutex<Vec<ApiRequest>>,
    observers: Mutex<Vec<mpsc::UnboundedSender<ApiRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request with `response`
    pub fn always(response: ApiResponse) -> Self {
        let mock = Self::new();
        *mock.fallback.lock() = Some(response);
        mock
    }

    pub fn push_response(&self, response: ApiResponse) -> &Self {
        self.queued.lock().push_back(Ok(response));
        self
    }

    pub fn push_error(&self, error: BotListError) -> &Self {
        self.queued.lock().push_back(Err(error));
        self
    }

    /// Stream of requests, delivered as they are sent
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<ApiRequest> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.lock().push(tx);
        rx
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> BotListResult<ApiResponse> {
        self.requests.lock().push(request.clone());
        self.observers
            .lock()
            .retain(|tx| tx.send(request.clone()).is_ok());

        if let Some(next) = self.queued.lock().pop_front() {
            return next;
        }

        self.fallback
            .lock()
            .clone()
            .ok_or_else(|| BotListError::network(format!("No mock response for {}", request.url)))
    }
}
