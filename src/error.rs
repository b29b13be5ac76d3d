//! Error types for snmp-manager.
//!
//! All errors are `#[non_exhaustive]` to allow adding new variants without
//! breaking changes. The taxonomy mirrors the phases of an operation:
//! validation errors happen before any I/O, transport errors during the UDP
//! exchange, and decode errors while parsing the reply. SNMP protocol errors
//! (errorStatus != noError) are *not* represented here - the agent answered,
//! so the Manager reports them as a result line instead.

use std::net::SocketAddr;
use std::time::Duration;

use crate::oid::Oid;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// BER decode error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// Data ended before the declared length was satisfied.
    Truncated,
    /// Invalid or indefinite BER length encoding.
    MalformedLength,
    /// Length field uses more octets than we accept.
    LengthTooLong { octets: usize },
    /// Declared length exceeds the sanity maximum.
    LengthExceedsMax { length: usize, max: usize },
    /// Expected a different tag.
    UnexpectedTag { expected: u8, actual: u8 },
    /// Zero-length INTEGER content.
    ZeroLengthInteger,
    /// INTEGER content does not fit in 64 bits.
    IntegerOverflow,
    /// NULL with non-zero length.
    InvalidNull,
    /// IpAddress content is not exactly 4 octets.
    InvalidIpAddressLength { length: usize },
    /// Invalid OID subidentifier encoding.
    InvalidOidEncoding,
    /// OID has too many subidentifiers.
    OidTooLong { count: usize, max: usize },
    /// Unknown SNMP version in the message envelope.
    UnknownVersion(i64),
    /// Unknown PDU tag.
    UnknownPduType(u8),
    /// Response request-id does not match the request.
    RequestIdMismatch { expected: i32, actual: i32 },
    /// Response version does not match the request version.
    VersionMismatch { expected: i64, actual: i64 },
    /// Response PDU is not a Response (0xA2).
    UnexpectedPduType(u8),
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Truncated => write!(f, "unexpected end of data"),
            Self::MalformedLength => write!(f, "malformed length encoding"),
            Self::LengthTooLong { octets } => {
                write!(f, "length encoding too long ({} octets)", octets)
            }
            Self::LengthExceedsMax { length, max } => {
                write!(f, "length {} exceeds maximum {}", length, max)
            }
            Self::UnexpectedTag { expected, actual } => {
                write!(f, "expected tag 0x{:02X}, got 0x{:02X}", expected, actual)
            }
            Self::ZeroLengthInteger => write!(f, "zero-length integer"),
            Self::IntegerOverflow => write!(f, "integer does not fit in 64 bits"),
            Self::InvalidNull => write!(f, "NULL with non-zero length"),
            Self::InvalidIpAddressLength { length } => {
                write!(f, "IP address must be 4 bytes, got {}", length)
            }
            Self::InvalidOidEncoding => write!(f, "invalid OID encoding"),
            Self::OidTooLong { count, max } => {
                write!(f, "OID has {} subidentifiers, exceeds maximum {}", count, max)
            }
            Self::UnknownVersion(v) => write!(f, "unknown SNMP version: {}", v),
            Self::UnknownPduType(t) => write!(f, "unknown PDU type: 0x{:02X}", t),
            Self::RequestIdMismatch { expected, actual } => {
                write!(f, "request ID mismatch: expected {}, got {}", expected, actual)
            }
            Self::VersionMismatch { expected, actual } => {
                write!(f, "version mismatch: expected {}, got {}", expected, actual)
            }
            Self::UnexpectedPduType(t) => {
                write!(f, "expected Response PDU, got 0x{:02X}", t)
            }
        }
    }
}

/// OID validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OidErrorKind {
    /// A dotted component is not a non-negative integer in u32 range.
    InvalidArc,
    /// OID too short (minimum 2 components).
    TooShort,
    /// OID has too many components.
    TooManyArcs { count: usize, max: usize },
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArc => write!(f, "invalid component value"),
            Self::TooShort => write!(f, "OID must have at least 2 components"),
            Self::TooManyArcs { count, max } => {
                write!(f, "OID has {} components, exceeds maximum {}", count, max)
            }
        }
    }
}

/// SNMP error status codes (RFC 3416).
///
/// These are protocol-level results reported by the agent, not failures of
/// this library. The Manager renders them into the operation result as
/// `"<status> at <index>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    WrongType,
    WrongLength,
    WrongEncoding,
    WrongValue,
    NoCreation,
    InconsistentValue,
    ResourceUnavailable,
    CommitFailed,
    UndoFailed,
    AuthorizationError,
    NotWritable,
    InconsistentName,
    /// Unknown/future error status code.
    Unknown(i32),
}

impl ErrorStatus {
    /// Create from raw status code.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            7 => Self::WrongType,
            8 => Self::WrongLength,
            9 => Self::WrongEncoding,
            10 => Self::WrongValue,
            11 => Self::NoCreation,
            12 => Self::InconsistentValue,
            13 => Self::ResourceUnavailable,
            14 => Self::CommitFailed,
            15 => Self::UndoFailed,
            16 => Self::AuthorizationError,
            17 => Self::NotWritable,
            18 => Self::InconsistentName,
            other => Self::Unknown(other),
        }
    }

    /// Get the raw status code.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::NoAccess => 6,
            Self::WrongType => 7,
            Self::WrongLength => 8,
            Self::WrongEncoding => 9,
            Self::WrongValue => 10,
            Self::NoCreation => 11,
            Self::InconsistentValue => 12,
            Self::ResourceUnavailable => 13,
            Self::CommitFailed => 14,
            Self::UndoFailed => 15,
            Self::AuthorizationError => 16,
            Self::NotWritable => 17,
            Self::InconsistentName => 18,
            Self::Unknown(code) => code,
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::NoAccess => write!(f, "noAccess"),
            Self::WrongType => write!(f, "wrongType"),
            Self::WrongLength => write!(f, "wrongLength"),
            Self::WrongEncoding => write!(f, "wrongEncoding"),
            Self::WrongValue => write!(f, "wrongValue"),
            Self::NoCreation => write!(f, "noCreation"),
            Self::InconsistentValue => write!(f, "inconsistentValue"),
            Self::ResourceUnavailable => write!(f, "resourceUnavailable"),
            Self::CommitFailed => write!(f, "commitFailed"),
            Self::UndoFailed => write!(f, "undoFailed"),
            Self::AuthorizationError => write!(f, "authorizationError"),
            Self::NotWritable => write!(f, "notWritable"),
            Self::InconsistentName => write!(f, "inconsistentName"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// The main error type for all snmp-manager operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// SET value does not parse as an Integer. Detected before any network I/O.
    #[error("value {value:?} is not a valid Integer for SET")]
    InvalidIntegerValue { value: String },

    /// Caller-supplied OID string is malformed.
    #[error("invalid OID {input:?}: {kind}")]
    InvalidOid { kind: OidErrorKind, input: String },

    /// Agent host name/address could not be resolved. Fatal, never retried.
    #[error("cannot resolve agent address {host:?}: {source}")]
    UnreachableHost {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// UDP socket failure during send or receive.
    #[error("socket error{}: {source}", target.map(|t| format!(" communicating with {}", t)).unwrap_or_default())]
    Socket {
        target: Option<SocketAddr>,
        #[source]
        source: std::io::Error,
    },

    /// No reply within the per-exchange timeout, after all retries.
    #[error("timeout after {elapsed:?} waiting for {target} ({retries} retries)")]
    Timeout {
        target: SocketAddr,
        elapsed: Duration,
        retries: u32,
    },

    /// Reply could not be decoded. Never retried.
    #[error("decode error at offset {offset}: {kind}")]
    Decode { offset: usize, kind: DecodeErrorKind },

    /// Bulk walk received an OID not greater than the previous one.
    ///
    /// Without this guard a misbehaving agent can loop a walk forever.
    #[error("walk returned non-increasing OID: {previous} followed by {current}")]
    NonIncreasingOid { previous: Oid, current: Oid },

    /// The caller's cancellation token fired mid-operation.
    #[error("operation cancelled")]
    Cancelled,

    /// The configured overall-operation deadline elapsed.
    #[error("operation deadline exceeded after {elapsed:?}")]
    DeadlineExceeded { elapsed: Duration },
}

impl Error {
    /// Construct a decode error at the given buffer offset.
    pub(crate) fn decode(offset: usize, kind: DecodeErrorKind) -> Self {
        Error::Decode { offset, kind }
    }

    /// Construct an OID validation error, keeping the offending input.
    pub(crate) fn invalid_oid(kind: OidErrorKind, input: impl Into<String>) -> Self {
        Error::InvalidOid {
            kind,
            input: input.into(),
        }
    }

    /// True for timeouts, the only error class the Manager retries.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_roundtrip() {
        for code in 0..=18 {
            assert_eq!(ErrorStatus::from_i32(code).as_i32(), code);
        }
        assert_eq!(ErrorStatus::from_i32(42), ErrorStatus::Unknown(42));
        assert_eq!(ErrorStatus::Unknown(42).as_i32(), 42);
    }

    #[test]
    fn test_error_status_display_names() {
        assert_eq!(ErrorStatus::NoSuchName.to_string(), "noSuchName");
        assert_eq!(ErrorStatus::BadValue.to_string(), "badValue");
        assert_eq!(ErrorStatus::Unknown(99).to_string(), "unknown(99)");
    }

    #[test]
    fn test_is_timeout() {
        let err = Error::Timeout {
            target: "127.0.0.1:161".parse().unwrap(),
            elapsed: Duration::from_secs(2),
            retries: 1,
        };
        assert!(err.is_timeout());
        assert!(
            !Error::InvalidIntegerValue {
                value: "abc".into()
            }
            .is_timeout()
        );
    }
}
