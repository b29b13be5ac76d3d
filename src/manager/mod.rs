//! SNMP manager: the operation layer.
//!
//! The [`Manager`] owns a transport and a request-id counter and exposes the
//! four operations: GET, GETNEXT, GETBULK walk, and SET. Each operation
//! targets an agent by hostname or IP with a per-call community string and
//! yields an [`OperationResult`] of display lines.

mod retry;

pub use retry::{Backoff, Retry};

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use tokio::net::lookup_host;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{DecodeErrorKind, Error, Result};
use crate::message::CommunityMessage;
use crate::oid::Oid;
use crate::pdu::{Pdu, PduType};
use crate::result::OperationResult;
use crate::transport::{Transport, UdpTransport};
use crate::value::Value;
use crate::version::Version;

/// Value type selector for SET operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetType {
    /// INTEGER; the raw input must parse as an i64.
    Integer,
    /// OCTET STRING; any input is accepted as-is, including empty.
    OctetString,
}

impl SetType {
    /// Parse raw user input into a wire value.
    ///
    /// Validation happens here, before any network activity.
    pub fn parse(self, raw: &str) -> Result<Value> {
        match self {
            SetType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| Error::InvalidIntegerValue {
                    value: raw.to_string(),
                }),
            SetType::OctetString => Ok(Value::OctetString(Bytes::copy_from_slice(raw.as_bytes()))),
        }
    }
}

/// Configuration for a [`Manager`].
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Protocol version used for requests and enforced on responses.
    pub version: Version,
    /// Agent UDP port.
    pub port: u16,
    /// Per-attempt receive timeout.
    pub timeout: Duration,
    /// Retry policy for timed-out exchanges.
    pub retry: Retry,
    /// Terminate bulk walks when the agent leaves the requested subtree.
    ///
    /// Off by default: the walk then runs to endOfMibView (or an error),
    /// reporting whatever the agent returns.
    pub check_subtree: bool,
    /// Max-repetitions for each GETBULK request.
    pub max_repetitions: i32,
    /// Overall wall-clock budget for one operation, retries included.
    pub operation_deadline: Option<Duration>,
    /// Upper bound on lines collected by a walk.
    pub max_walk_results: Option<usize>,
    /// Cooperative cancellation for long-running walks.
    pub cancel: Option<CancellationToken>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            version: Version::V2c,
            port: 161,
            timeout: Duration::from_secs(5),
            retry: Retry::default(),
            check_subtree: false,
            max_repetitions: 1,
            operation_deadline: None,
            max_walk_results: None,
            cancel: None,
        }
    }
}

/// Ensure a scalar OID addresses an instance.
///
/// GET, GETNEXT, and SET target scalar instances, which end in `.0`;
/// appending the instance subidentifier when it is missing lets callers
/// pass the bare object OID. Walk bases are never normalized.
pub fn normalize_scalar_oid(oid: &Oid) -> Oid {
    if oid.last_arc() == Some(0) {
        oid.clone()
    } else {
        oid.child(0)
    }
}

/// Asynchronous SNMP manager.
///
/// Generic over [`Transport`] so tests can substitute
/// [`MockTransport`](crate::transport::MockTransport); production use goes
/// through [`UdpTransport`].
pub struct Manager<T: Transport = UdpTransport> {
    transport: T,
    config: ManagerConfig,
    request_id: AtomicI32,
}

impl Manager<UdpTransport> {
    /// Create a manager over UDP.
    pub fn new(config: ManagerConfig) -> Self {
        Self::with_transport(UdpTransport::new(), config)
    }
}

impl<T: Transport> Manager<T> {
    /// Create a manager over a custom transport.
    pub fn with_transport(transport: T, config: ManagerConfig) -> Self {
        Self {
            transport,
            config,
            request_id: AtomicI32::new(initial_request_id()),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// SNMP GET of a scalar object.
    pub async fn get(
        &self,
        agent: &str,
        community: &str,
        oid: &str,
    ) -> Result<OperationResult> {
        let oid = self.parse_scalar_oid(oid)?;
        debug!(target: "snmp_manager::manager", agent, %oid, "get");
        self.guard(async {
            let request_id = self.next_request_id();
            self.single(agent, community, Pdu::get(request_id, oid))
                .await
        })
        .await
    }

    /// SNMP GETNEXT relative to a scalar object.
    pub async fn next(
        &self,
        agent: &str,
        community: &str,
        oid: &str,
    ) -> Result<OperationResult> {
        let oid = self.parse_scalar_oid(oid)?;
        debug!(target: "snmp_manager::manager", agent, %oid, "next");
        self.guard(async {
            let request_id = self.next_request_id();
            self.single(agent, community, Pdu::get_next(request_id, oid))
                .await
        })
        .await
    }

    /// SNMP SET of a scalar object.
    ///
    /// The value is validated against `set_type` before anything touches
    /// the network.
    pub async fn set(
        &self,
        agent: &str,
        community: &str,
        oid: &str,
        set_type: SetType,
        value: &str,
    ) -> Result<OperationResult> {
        let value = set_type.parse(value)?;
        let oid = self.parse_scalar_oid(oid)?;
        debug!(target: "snmp_manager::manager", agent, %oid, ?set_type, "set");
        self.guard(async {
            let request_id = self.next_request_id();
            self.single(agent, community, Pdu::set(request_id, oid, value))
                .await
        })
        .await
    }

    /// GETBULK walk starting at `oid`.
    ///
    /// Issues GETBULK requests with non-repeaters 0 and the configured
    /// max-repetitions, advancing through the MIB until endOfMibView, a
    /// protocol error line, or one of the configured limits.
    pub async fn bulk_walk(
        &self,
        agent: &str,
        community: &str,
        oid: &str,
    ) -> Result<OperationResult> {
        let base = self.parse_oid(oid)?;
        debug!(target: "snmp_manager::manager", agent, %base, "bulk_walk");
        self.guard(self.walk_loop(agent, community, base)).await
    }

    async fn walk_loop(
        &self,
        agent: &str,
        community: &str,
        base: Oid,
    ) -> Result<OperationResult> {
        let target = self.resolve(agent).await?;
        let mut current = base.clone();
        let mut last_returned: Option<Oid> = None;
        let mut result = OperationResult::new();

        'walk: loop {
            let request_id = self.next_request_id();
            let pdu = Pdu::get_bulk(request_id, current.clone(), 0, self.config.max_repetitions);
            let response = self.exchange_pdu(target, community, pdu).await?;

            if response.is_error() {
                result.push_line(format!(
                    "{} at {}",
                    response.error_status_enum(),
                    response.error_index
                ));
                break;
            }

            // An agent returning nothing at all would loop us forever
            if response.varbinds.is_empty() {
                break;
            }

            for vb in response.varbinds {
                if matches!(vb.value, Value::EndOfMibView) {
                    break 'walk;
                }
                if self.config.check_subtree && !vb.oid.starts_with(&base) {
                    break 'walk;
                }
                if let Some(last) = &last_returned
                    && vb.oid <= *last
                {
                    return Err(Error::NonIncreasingOid {
                        previous: last.clone(),
                        current: vb.oid,
                    });
                }

                result.push_varbind(&vb);
                current = vb.oid.clone();
                last_returned = Some(vb.oid);

                if let Some(max) = self.config.max_walk_results
                    && result.len() >= max
                {
                    debug!(
                        target: "snmp_manager::manager",
                        max, "walk stopped at result cap"
                    );
                    break 'walk;
                }
            }
        }

        Ok(result)
    }

    /// One request/response operation.
    async fn single(
        &self,
        agent: &str,
        community: &str,
        pdu: Pdu,
    ) -> Result<OperationResult> {
        let target = self.resolve(agent).await?;
        let response = self.exchange_pdu(target, community, pdu).await?;

        let mut result = OperationResult::new();
        if response.is_error() {
            result.push_line(format!(
                "{} at {}",
                response.error_status_enum(),
                response.error_index
            ));
        } else {
            for vb in &response.varbinds {
                result.push_varbind(vb);
            }
        }
        Ok(result)
    }

    /// Encode, exchange with retry, decode, and validate one PDU.
    async fn exchange_pdu(
        &self,
        target: SocketAddr,
        community: &str,
        pdu: Pdu,
    ) -> Result<Pdu> {
        let request_id = pdu.request_id;
        let message = CommunityMessage::new(
            self.config.version,
            Bytes::copy_from_slice(community.as_bytes()),
            pdu,
        );
        let payload = message.encode();

        let data = self.exchange_with_retry(target, &payload).await?;
        let response = CommunityMessage::decode(data)?;
        self.validate_response(&response, request_id)?;
        Ok(response.pdu)
    }

    /// Run an exchange, retrying timeouts per the configured policy.
    async fn exchange_with_retry(&self, target: SocketAddr, payload: &[u8]) -> Result<Bytes> {
        let mut attempt = 0u32;
        loop {
            match self
                .transport
                .exchange(target, payload, self.config.timeout)
                .await
            {
                Ok(data) => return Ok(data),
                Err(Error::Timeout {
                    target, elapsed, ..
                }) => {
                    if attempt >= self.config.retry.max_attempts {
                        return Err(Error::Timeout {
                            target,
                            elapsed,
                            retries: attempt,
                        });
                    }
                    let delay = self.config.retry.compute_delay(attempt);
                    attempt += 1;
                    debug!(
                        target: "snmp_manager::manager",
                        %target, attempt, ?delay, "timeout, retrying"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn validate_response(&self, response: &CommunityMessage, request_id: i32) -> Result<()> {
        if response.version != self.config.version {
            return Err(Error::decode(
                0,
                DecodeErrorKind::VersionMismatch {
                    expected: self.config.version.as_i64(),
                    actual: response.version.as_i64(),
                },
            ));
        }
        if response.pdu.pdu_type != PduType::Response {
            return Err(Error::decode(
                0,
                DecodeErrorKind::UnexpectedPduType(response.pdu.pdu_type.tag()),
            ));
        }
        if response.pdu.request_id != request_id {
            return Err(Error::decode(
                0,
                DecodeErrorKind::RequestIdMismatch {
                    expected: request_id,
                    actual: response.pdu.request_id,
                },
            ));
        }
        Ok(())
    }

    /// Resolve an agent name to a socket address using the configured port.
    async fn resolve(&self, agent: &str) -> Result<SocketAddr> {
        let mut addrs = lookup_host((agent, self.config.port))
            .await
            .map_err(|source| Error::UnreachableHost {
                host: agent.to_string(),
                source,
            })?;
        addrs.next().ok_or_else(|| Error::UnreachableHost {
            host: agent.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "hostname resolved to no addresses"),
        })
    }

    fn parse_oid(&self, oid: &str) -> Result<Oid> {
        let parsed = Oid::parse(oid)?;
        parsed.validate_min_len()?;
        Ok(parsed)
    }

    fn parse_scalar_oid(&self, oid: &str) -> Result<Oid> {
        Ok(normalize_scalar_oid(&self.parse_oid(oid)?))
    }

    fn next_request_id(&self) -> i32 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Apply the operation deadline and cancellation token, when configured.
    async fn guard<F, R>(&self, fut: F) -> Result<R>
    where
        F: Future<Output = Result<R>>,
    {
        let deadline = self.config.operation_deadline;
        let fut = async move {
            match deadline {
                Some(limit) => tokio::time::timeout(limit, fut)
                    .await
                    .map_err(|_| Error::DeadlineExceeded { elapsed: limit })?,
                None => fut.await,
            }
        };

        match &self.config.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(Error::Cancelled),
                result = fut => result,
            },
            None => fut.await,
        }
    }
}

/// Seed the request-id counter from the clock so concurrent managers do
/// not start from the same value.
fn initial_request_id() -> i32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    (nanos & 0x3FFF_FFFF) as i32
}
