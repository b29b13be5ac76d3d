//! Transport layer abstraction.
//!
//! Provides the [`Transport`] trait, the UDP implementation used in
//! production, and an in-memory mock for tests.

mod mock;
mod udp;

pub use mock::*;
pub use udp::*;

use crate::error::Result;
use bytes::Bytes;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

/// Client-side transport abstraction.
///
/// A transport performs one request/response exchange: send an encoded
/// message to the target and wait up to `timeout` for a single datagram
/// back. Retry policy lives above the transport in the Manager; a
/// transport reports each timeout as [`Error::Timeout`] with
/// `retries: 0` and never resends on its own.
///
/// # Clone Requirement
///
/// The `Clone` bound lets the Manager hand a transport to concurrent
/// operations without borrow conflicts. Implementations keep shared state
/// behind `Arc`, so clone is a reference count increment.
///
/// [`Error::Timeout`]: crate::error::Error::Timeout
pub trait Transport: Send + Sync + Clone {
    /// Send `payload` to `target` and await one response datagram.
    fn exchange(
        &self,
        target: SocketAddr,
        payload: &[u8],
        timeout: Duration,
    ) -> impl Future<Output = Result<Bytes>> + Send;
}
