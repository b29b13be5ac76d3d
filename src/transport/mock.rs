//! Mock transport for testing.
//!
//! Provides a programmable transport that can simulate exchanges, timeouts,
//! and socket errors without a network.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::message::CommunityMessage;
use crate::transport::Transport;

/// A scripted response for one exchange.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this datagram (request-id is patched to match the request).
    Data(Bytes),
    /// Return this datagram exactly as queued, no patching.
    RawData(Bytes),
    /// Simulate a receive timeout.
    Timeout,
    /// Simulate a socket error.
    SocketError(String),
}

/// A request recorded by the mock.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    /// The raw request datagram.
    pub data: Bytes,
    /// The request ID extracted from the message, if it decoded.
    pub request_id: Option<i32>,
}

struct MockTransportInner {
    responses: VecDeque<MockResponse>,
    requests: Vec<RecordedRequest>,
}

/// Mock transport for testing Manager behavior.
///
/// Responses are consumed in FIFO order, one per exchange. An empty queue
/// behaves like a timeout, which keeps accidental extra exchanges visible
/// in tests.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

impl Default for MockTransportInner {
    fn default() -> Self {
        Self {
            responses: VecDeque::new(),
            requests: Vec::new(),
        }
    }
}

impl MockTransport {
    /// Create a new mock transport with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a datagram response.
    ///
    /// The request-id inside is patched to match the actual request, so
    /// tests can build responses without knowing the Manager's counter.
    /// Use [`queue_raw_response`](Self::queue_raw_response) to test
    /// request-id mismatch handling.
    pub fn queue_response(&self, data: impl Into<Bytes>) {
        let mut inner = self.inner.lock().unwrap();
        inner.responses.push_back(MockResponse::Data(data.into()));
    }

    /// Queue a datagram that is returned without request-id patching.
    pub fn queue_raw_response(&self, data: impl Into<Bytes>) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .responses
            .push_back(MockResponse::RawData(data.into()));
    }

    /// Queue a timeout.
    pub fn queue_timeout(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.responses.push_back(MockResponse::Timeout);
    }

    /// Queue a socket error.
    pub fn queue_socket_error(&self, msg: impl Into<String>) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .responses
            .push_back(MockResponse::SocketError(msg.into()));
    }

    /// All recorded requests, in exchange order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.clone()
    }

    /// Number of exchanges performed so far.
    pub fn exchange_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.requests.len()
    }

    /// Number of responses still queued.
    pub fn queued_response_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.responses.len()
    }

    fn extract_request_id(data: &[u8]) -> Option<i32> {
        CommunityMessage::decode(Bytes::copy_from_slice(data))
            .ok()
            .map(|msg| msg.pdu.request_id)
    }

    fn patch_request_id(data: Bytes, new_id: i32) -> Bytes {
        match CommunityMessage::decode(data.clone()) {
            Ok(mut msg) => {
                msg.pdu.request_id = new_id;
                msg.encode()
            }
            // Deliberately malformed test data passes through untouched
            Err(_) => data,
        }
    }
}

impl Transport for MockTransport {
    async fn exchange(
        &self,
        target: SocketAddr,
        payload: &[u8],
        timeout: Duration,
    ) -> Result<Bytes> {
        let data = Bytes::copy_from_slice(payload);
        let request_id = Self::extract_request_id(&data);

        let response = {
            let mut inner = self.inner.lock().unwrap();
            inner.requests.push(RecordedRequest { data, request_id });
            inner.responses.pop_front()
        };

        match response {
            Some(MockResponse::Data(data)) => {
                let patched = match request_id {
                    Some(id) => Self::patch_request_id(data, id),
                    None => data,
                };
                Ok(patched)
            }
            Some(MockResponse::RawData(data)) => Ok(data),
            Some(MockResponse::SocketError(msg)) => Err(Error::Socket {
                target: Some(target),
                source: std::io::Error::other(msg),
            }),
            Some(MockResponse::Timeout) | None => Err(Error::Timeout {
                target,
                elapsed: timeout,
                retries: 0,
            }),
        }
    }
}

/// Builder for response datagrams used in tests.
///
/// Constructs valid Response messages without hand-crafting BER.
pub struct ResponseBuilder {
    request_id: i32,
    varbinds: Vec<crate::varbind::VarBind>,
    error_status: i32,
    error_index: i32,
}

impl ResponseBuilder {
    /// Create a builder. The request-id here is a placeholder; the mock
    /// patches it to the real one on delivery.
    pub fn new(request_id: i32) -> Self {
        Self {
            request_id,
            varbinds: Vec::new(),
            error_status: 0,
            error_index: 0,
        }
    }

    /// Add a varbind.
    pub fn varbind(mut self, oid: crate::Oid, value: crate::Value) -> Self {
        self.varbinds.push(crate::varbind::VarBind::new(oid, value));
        self
    }

    /// Set the error status.
    pub fn error_status(mut self, status: i32) -> Self {
        self.error_status = status;
        self
    }

    /// Set the error index.
    pub fn error_index(mut self, index: i32) -> Self {
        self.error_index = index;
        self
    }

    /// Build a v2c Response message.
    pub fn build_v2c(self, community: &[u8]) -> Bytes {
        self.build(crate::Version::V2c, community)
    }

    /// Build a v1 Response message.
    pub fn build_v1(self, community: &[u8]) -> Bytes {
        self.build(crate::Version::V1, community)
    }

    fn build(self, version: crate::Version, community: &[u8]) -> Bytes {
        let pdu = crate::Pdu::response(
            self.request_id,
            self.error_status,
            self.error_index,
            self.varbinds,
        );
        CommunityMessage::new(version, Bytes::copy_from_slice(community), pdu).encode()
    }
}
