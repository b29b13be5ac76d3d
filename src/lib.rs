// Allow large error types - the Error enum carries OIDs inline for debugging
// convenience. Boxing them would add allocations for a marginal size win.
#![allow(clippy::result_large_err)]

//! # snmp-manager
//!
//! Async SNMP manager core for SNMPv1/v2c over UDP.
//!
//! ## Features
//!
//! - GET, GETNEXT, GETBULK walk, and SET operations
//! - Async API built on Tokio
//! - Zero-copy BER encoding/decoding
//! - Type-safe OID and value handling
//! - Per-attempt timeout with configurable retry
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snmp_manager::{Manager, ManagerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), snmp_manager::Error> {
//!     let manager = Manager::new(ManagerConfig::default());
//!
//!     // GET sysDescr; the scalar instance `.0` is appended automatically.
//!     let result = manager.get("192.168.1.1", "public", "1.3.6.1.2.1.1.1").await?;
//!     for line in result.lines() {
//!         println!("{line}");
//!     }
//!
//!     // Walk the system subtree.
//!     let walk = manager.bulk_walk("192.168.1.1", "public", "1.3.6.1.2.1.1").await?;
//!     println!("{} objects", walk.len());
//!
//!     Ok(())
//! }
//! ```

pub mod ber;
pub mod error;
pub mod manager;
pub mod message;
pub mod oid;
pub mod pdu;
pub mod result;
pub mod transport;
pub mod value;
pub mod varbind;
pub mod version;

pub(crate) mod util;

// Re-exports for convenience
pub use error::{DecodeErrorKind, Error, ErrorStatus, OidErrorKind, Result};
pub use manager::{Backoff, Manager, ManagerConfig, Retry, SetType, normalize_scalar_oid};
pub use message::CommunityMessage;
pub use oid::Oid;
pub use pdu::{Pdu, PduType};
pub use result::OperationResult;
pub use transport::{MockTransport, ResponseBuilder, Transport, UdpTransport};
pub use value::Value;
pub use varbind::VarBind;
pub use version::Version;
