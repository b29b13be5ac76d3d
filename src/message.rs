//! Community-based message envelope (SNMPv1/v2c).
//!
//! The envelope is `SEQUENCE { version INTEGER, community OCTET STRING,
//! data <PDU> }` per RFC 1901. The community string is kept as raw bytes;
//! agents are not required to use UTF-8 there.

use bytes::Bytes;

use crate::ber::{Decoder, EncodeBuf};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::pdu::Pdu;
use crate::version::Version;

/// An SNMPv1/v2c message.
#[derive(Debug, Clone)]
pub struct CommunityMessage {
    /// Protocol version.
    pub version: Version,
    /// Community string (raw bytes, not necessarily UTF-8).
    pub community: Bytes,
    /// The enclosed PDU.
    pub pdu: Pdu,
}

impl CommunityMessage {
    /// Create a new message.
    pub fn new(version: Version, community: impl Into<Bytes>, pdu: Pdu) -> Self {
        Self {
            version,
            community: community.into(),
            pdu,
        }
    }

    /// Encode the full message to BER, ready to send.
    pub fn encode(&self) -> Bytes {
        let mut buf = EncodeBuf::new();
        buf.push_sequence(|buf| {
            self.pdu.encode(buf);
            buf.push_octet_string(&self.community);
            buf.push_integer(self.version.as_i64());
        });
        buf.finish()
    }

    /// Decode a message from a received datagram.
    pub fn decode(data: Bytes) -> Result<Self> {
        let mut decoder = Decoder::new(data);
        let mut seq = decoder.read_sequence()?;

        let version_offset = seq.offset();
        let raw_version = seq.read_integer()?;
        let version = Version::from_i64(raw_version).ok_or_else(|| {
            Error::decode(version_offset, DecodeErrorKind::UnknownVersion(raw_version))
        })?;

        let community = seq.read_octet_string()?;
        let pdu = Pdu::decode(&mut seq)?;

        Ok(CommunityMessage {
            version,
            community,
            pdu,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use crate::value::Value;
    use crate::varbind::VarBind;

    #[test]
    fn test_message_roundtrip() {
        let msg = CommunityMessage::new(
            Version::V2c,
            &b"public"[..],
            Pdu::get(1234, oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)),
        );

        let encoded = msg.encode();
        let decoded = CommunityMessage::decode(encoded).unwrap();

        assert_eq!(decoded.version, Version::V2c);
        assert_eq!(&decoded.community[..], b"public");
        assert_eq!(decoded.pdu.request_id, 1234);
        assert_eq!(decoded.pdu.varbinds[0].oid, oid!(1, 3, 6, 1, 2, 1, 1, 1, 0));
    }

    #[test]
    fn test_v1_roundtrip() {
        let msg = CommunityMessage::new(
            Version::V1,
            &b"private"[..],
            Pdu::set(7, oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::Integer(3)),
        );
        let decoded = CommunityMessage::decode(msg.encode()).unwrap();
        assert_eq!(decoded.version, Version::V1);
        assert_eq!(&decoded.community[..], b"private");
    }

    #[test]
    fn test_unknown_version_rejected() {
        // Envelope claiming version 3 with an otherwise well-formed body
        let msg = CommunityMessage::new(
            Version::V2c,
            &b"public"[..],
            Pdu::response(1, 0, 0, vec![VarBind::null(oid!(1, 3, 6, 1))]),
        );
        let mut raw = msg.encode().to_vec();
        // version INTEGER is the first TLV inside the outer sequence:
        // [0x30, len, 0x02, 0x01, version, ...]
        assert_eq!(raw[2], 0x02);
        raw[4] = 3;

        let err = CommunityMessage::decode(Bytes::from(raw)).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                kind: DecodeErrorKind::UnknownVersion(3),
                ..
            }
        ));
    }

    #[test]
    fn test_known_answer_get() {
        // GET sysDescr.0, community "public", request-id 1, SNMPv2c
        let msg = CommunityMessage::new(
            Version::V2c,
            &b"public"[..],
            Pdu::get(1, oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)),
        );
        let expected: &[u8] = &[
            0x30, 0x26, // SEQUENCE
            0x02, 0x01, 0x01, // version = 1 (v2c)
            0x04, 0x06, b'p', b'u', b'b', b'l', b'i', b'c', // community
            0xA0, 0x19, // GetRequest
            0x02, 0x01, 0x01, // request-id = 1
            0x02, 0x01, 0x00, // error-status = 0
            0x02, 0x01, 0x00, // error-index = 0
            0x30, 0x0E, // varbind list
            0x30, 0x0C, // varbind
            0x06, 0x08, 0x2B, 0x06, 0x01, 0x02, 0x01, 0x01, 0x01, 0x00, // 1.3.6.1.2.1.1.1.0
            0x05, 0x00, // NULL
        ];
        assert_eq!(&msg.encode()[..], expected);
    }
}
