//! SNMP Protocol Data Units (PDUs).
//!
//! All five operations share one wire structure, so a single [`Pdu`] struct
//! tagged by [`PduType`] represents them; the codec and the Manager match on
//! the type exhaustively. For GETBULK the error-status and error-index
//! fields are repurposed as non-repeaters and max-repetitions (RFC 3416
//! Section 4.2.3).

use crate::ber::{Decoder, EncodeBuf};
use crate::error::{DecodeErrorKind, Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::value::Value;
use crate::varbind::{VarBind, decode_varbind_list, encode_varbind_list};

/// PDU type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PduType {
    GetRequest = 0xA0,
    GetNextRequest = 0xA1,
    Response = 0xA2,
    SetRequest = 0xA3,
    GetBulkRequest = 0xA5,
}

impl PduType {
    /// Create from tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0xA0 => Some(Self::GetRequest),
            0xA1 => Some(Self::GetNextRequest),
            0xA2 => Some(Self::Response),
            0xA3 => Some(Self::SetRequest),
            0xA5 => Some(Self::GetBulkRequest),
            _ => None,
        }
    }

    /// Get the tag byte.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GetRequest => write!(f, "GetRequest"),
            Self::GetNextRequest => write!(f, "GetNextRequest"),
            Self::Response => write!(f, "Response"),
            Self::SetRequest => write!(f, "SetRequest"),
            Self::GetBulkRequest => write!(f, "GetBulkRequest"),
        }
    }
}

/// Generic PDU structure for request/response operations.
#[derive(Debug, Clone)]
pub struct Pdu {
    /// PDU type
    pub pdu_type: PduType,
    /// Request ID for correlating requests and responses.
    ///
    /// Must be unique per in-flight exchange. The transport is strictly
    /// one request/response at a time today, but uniqueness is preserved so
    /// pipelined transports can correlate replies later.
    pub request_id: i32,
    /// Error status (0 for requests; non-repeaters for GETBULK)
    pub error_status: i32,
    /// Error index, 1-based (0 = none; max-repetitions for GETBULK)
    pub error_index: i32,
    /// Variable bindings
    pub varbinds: Vec<VarBind>,
}

impl Pdu {
    /// Create a GET request for a single OID.
    pub fn get(request_id: i32, oid: Oid) -> Self {
        Self {
            pdu_type: PduType::GetRequest,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds: vec![VarBind::null(oid)],
        }
    }

    /// Create a GETNEXT request for a single OID.
    pub fn get_next(request_id: i32, oid: Oid) -> Self {
        Self {
            pdu_type: PduType::GetNextRequest,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds: vec![VarBind::null(oid)],
        }
    }

    /// Create a GETBULK request for a single OID.
    pub fn get_bulk(request_id: i32, oid: Oid, non_repeaters: i32, max_repetitions: i32) -> Self {
        Self {
            pdu_type: PduType::GetBulkRequest,
            request_id,
            error_status: non_repeaters,
            error_index: max_repetitions,
            varbinds: vec![VarBind::null(oid)],
        }
    }

    /// Create a SET request carrying an OID and the value to write.
    pub fn set(request_id: i32, oid: Oid, value: Value) -> Self {
        Self {
            pdu_type: PduType::SetRequest,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds: vec![VarBind::new(oid, value)],
        }
    }

    /// Create a Response PDU (used by the mock transport and tests).
    pub fn response(
        request_id: i32,
        error_status: i32,
        error_index: i32,
        varbinds: Vec<VarBind>,
    ) -> Self {
        Self {
            pdu_type: PduType::Response,
            request_id,
            error_status,
            error_index,
            varbinds,
        }
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_constructed(self.pdu_type.tag(), |buf| {
            encode_varbind_list(buf, &self.varbinds);
            buf.push_integer(self.error_index as i64);
            buf.push_integer(self.error_status as i64);
            buf.push_integer(self.request_id as i64);
        });
    }

    /// Decode from BER.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let pdu_tag = decoder.read_tag()?;
        let pdu_type = PduType::from_tag(pdu_tag).ok_or_else(|| {
            Error::decode(decoder.offset() - 1, DecodeErrorKind::UnknownPduType(pdu_tag))
        })?;

        let len = decoder.read_length()?;
        let mut pdu_decoder = decoder.sub_decoder(len)?;

        let request_id = read_i32(&mut pdu_decoder)?;
        let error_status = read_i32(&mut pdu_decoder)?;
        let error_index = read_i32(&mut pdu_decoder)?;
        let varbinds = decode_varbind_list(&mut pdu_decoder)?;

        Ok(Pdu {
            pdu_type,
            request_id,
            error_status,
            error_index,
            varbinds,
        })
    }

    /// Check if this is an error response.
    pub fn is_error(&self) -> bool {
        self.error_status != 0
    }

    /// Get the error status as an enum.
    pub fn error_status_enum(&self) -> ErrorStatus {
        ErrorStatus::from_i32(self.error_status)
    }
}

/// Read an INTEGER that must fit an i32 (PDU header fields).
fn read_i32(decoder: &mut Decoder) -> Result<i32> {
    let offset = decoder.offset();
    let value = decoder.read_integer()?;
    i32::try_from(value).map_err(|_| Error::decode(offset, DecodeErrorKind::IntegerOverflow))
}
