//! SNMP value types.
//!
//! The [`Value`] enum covers the ASN.1 primitives the manager actually
//! exchanges (INTEGER, OCTET STRING, NULL, OBJECT IDENTIFIER), the SMIv2
//! application types agents commonly return during walks, the v2c exception
//! values, and an opaque passthrough for tags we do not recognize. Values
//! are immutable once constructed.

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use crate::util::hex_encode;
use bytes::Bytes;

/// SNMP value.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// INTEGER (signed 64-bit)
    Integer(i64),

    /// OCTET STRING (arbitrary bytes)
    OctetString(Bytes),

    /// NULL (placeholder value in read requests)
    Null,

    /// OBJECT IDENTIFIER
    ObjectIdentifier(Oid),

    /// IpAddress (4 bytes, big-endian)
    IpAddress([u8; 4]),

    /// Counter32 (unsigned 32-bit, wrapping)
    Counter32(u32),

    /// Gauge32 / Unsigned32 (unsigned 32-bit, non-wrapping)
    Gauge32(u32),

    /// TimeTicks (hundredths of seconds)
    TimeTicks(u32),

    /// Opaque (legacy, arbitrary bytes)
    Opaque(Bytes),

    /// Counter64 (unsigned 64-bit, wrapping; v2c only)
    Counter64(u64),

    /// noSuchObject exception - the OID is known but has no value.
    NoSuchObject,

    /// noSuchInstance exception - the specific instance does not exist.
    NoSuchInstance,

    /// endOfMibView exception - nothing lexicographically after the
    /// requested OID. Normal termination condition for walks.
    EndOfMibView,

    /// Unrecognized tag, preserved as raw bytes for display.
    Unknown { tag: u8, data: Bytes },
}

impl Value {
    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u64 (Counter64 or any 32-bit unsigned type, or a
    /// non-negative Integer).
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Counter64(v) => Some(*v),
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => Some(*v as u64),
            Value::Integer(v) if *v >= 0 => Some(*v as u64),
            _ => None,
        }
    }

    /// Try to get as bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::OctetString(v) | Value::Opaque(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as a UTF-8 string.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Try to get as OID.
    pub fn as_oid(&self) -> Option<&Oid> {
        match self {
            Value::ObjectIdentifier(oid) => Some(oid),
            _ => None,
        }
    }

    /// True for the v2c exception values.
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView
        )
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        match self {
            Value::Integer(v) => buf.push_integer(*v),
            Value::OctetString(data) => buf.push_octet_string(data),
            Value::Null => buf.push_null(),
            Value::ObjectIdentifier(oid) => buf.push_oid(oid),
            Value::IpAddress(addr) => buf.push_ip_address(*addr),
            Value::Counter32(v) => buf.push_unsigned32(tag::application::COUNTER32, *v),
            Value::Gauge32(v) => buf.push_unsigned32(tag::application::GAUGE32, *v),
            Value::TimeTicks(v) => buf.push_unsigned32(tag::application::TIMETICKS, *v),
            Value::Opaque(data) => buf.push_raw_tlv(tag::application::OPAQUE, data),
            Value::Counter64(v) => buf.push_counter64(*v),
            Value::NoSuchObject => buf.push_raw_tlv(tag::context::NO_SUCH_OBJECT, &[]),
            Value::NoSuchInstance => buf.push_raw_tlv(tag::context::NO_SUCH_INSTANCE, &[]),
            Value::EndOfMibView => buf.push_raw_tlv(tag::context::END_OF_MIB_VIEW, &[]),
            Value::Unknown { tag, data } => buf.push_raw_tlv(*tag, data),
        }
    }

    /// Decode from BER.
    ///
    /// Unrecognized tags are not fatal: they decode to [`Value::Unknown`]
    /// and render opaquely, so a single exotic varbind cannot sink a whole
    /// response.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let tag = decoder.read_tag()?;
        let len = decoder.read_length()?;

        match tag {
            tag::universal::INTEGER => {
                let value = decoder.read_integer_value(len)?;
                Ok(Value::Integer(value))
            }
            tag::universal::OCTET_STRING => {
                let data = decoder.read_bytes(len)?;
                Ok(Value::OctetString(data))
            }
            tag::universal::NULL => {
                if len != 0 {
                    return Err(Error::decode(decoder.offset(), DecodeErrorKind::InvalidNull));
                }
                Ok(Value::Null)
            }
            tag::universal::OBJECT_IDENTIFIER => {
                let oid = decoder.read_oid_value(len)?;
                Ok(Value::ObjectIdentifier(oid))
            }
            tag::application::IP_ADDRESS => {
                if len != 4 {
                    return Err(Error::decode(
                        decoder.offset(),
                        DecodeErrorKind::InvalidIpAddressLength { length: len },
                    ));
                }
                let data = decoder.read_bytes(4)?;
                Ok(Value::IpAddress([data[0], data[1], data[2], data[3]]))
            }
            tag::application::COUNTER32 => {
                let value = decoder.read_unsigned32_value(len)?;
                Ok(Value::Counter32(value))
            }
            tag::application::GAUGE32 => {
                let value = decoder.read_unsigned32_value(len)?;
                Ok(Value::Gauge32(value))
            }
            tag::application::TIMETICKS => {
                let value = decoder.read_unsigned32_value(len)?;
                Ok(Value::TimeTicks(value))
            }
            tag::application::OPAQUE => {
                let data = decoder.read_bytes(len)?;
                Ok(Value::Opaque(data))
            }
            tag::application::COUNTER64 => {
                let value = decoder.read_u64_value(len)?;
                Ok(Value::Counter64(value))
            }
            tag::context::NO_SUCH_OBJECT => {
                let _ = decoder.read_bytes(len)?;
                Ok(Value::NoSuchObject)
            }
            tag::context::NO_SUCH_INSTANCE => {
                let _ = decoder.read_bytes(len)?;
                Ok(Value::NoSuchInstance)
            }
            tag::context::END_OF_MIB_VIEW => {
                let _ = decoder.read_bytes(len)?;
                Ok(Value::EndOfMibView)
            }
            _ => {
                // Unknown tag - preserve raw bytes for display
                tracing::warn!(target: "snmp_manager::ber", tag = format_args!("0x{:02X}", tag), length = len, "unrecognized value tag, passing through opaquely");
                let data = decoder.read_bytes(len)?;
                Ok(Value::Unknown { tag, data })
            }
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::OctetString(data) => {
                // Display as string when valid UTF-8, hex otherwise
                if let Ok(s) = std::str::from_utf8(data) {
                    write!(f, "{}", s)
                } else {
                    write!(f, "0x{}", hex_encode(data))
                }
            }
            Value::Null => write!(f, "NULL"),
            Value::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Value::IpAddress(addr) => {
                write!(f, "{}.{}.{}.{}", addr[0], addr[1], addr[2], addr[3])
            }
            Value::Counter32(v) => write!(f, "{}", v),
            Value::Gauge32(v) => write!(f, "{}", v),
            Value::TimeTicks(v) => {
                let secs = v / 100;
                let days = secs / 86400;
                let hours = (secs % 86400) / 3600;
                let mins = (secs % 3600) / 60;
                let s = secs % 60;
                write!(f, "{}d {}h {}m {}s", days, hours, mins, s)
            }
            Value::Opaque(data) => write!(f, "Opaque(0x{})", hex_encode(data)),
            Value::Counter64(v) => write!(f, "{}", v),
            Value::NoSuchObject => write!(f, "noSuchObject"),
            Value::NoSuchInstance => write!(f, "noSuchInstance"),
            Value::EndOfMibView => write!(f, "endOfMibView"),
            Value::Unknown { tag, data } => {
                write!(f, "Unknown(tag=0x{:02X}, data=0x{})", tag, hex_encode(data))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn roundtrip(value: Value) -> Value {
        let mut buf = EncodeBuf::new();
        value.encode(&mut buf);
        let mut dec = Decoder::new(buf.finish());
        Value::decode(&mut dec).unwrap()
    }

    #[test]
    fn test_integer_roundtrip() {
        for v in [0i64, 1, -1, 127, 128, -128, -129, i64::MAX, i64::MIN] {
            assert_eq!(roundtrip(Value::Integer(v)), Value::Integer(v));
        }
    }

    #[test]
    fn test_octet_string_roundtrip() {
        let v = Value::OctetString(Bytes::from_static(b"Linux router1 5.4.0"));
        assert_eq!(roundtrip(v.clone()), v);

        let empty = Value::OctetString(Bytes::new());
        assert_eq!(roundtrip(empty.clone()), empty);
    }

    #[test]
    fn test_application_types_roundtrip() {
        for v in [
            Value::IpAddress([192, 168, 1, 1]),
            Value::Counter32(u32::MAX),
            Value::Gauge32(0),
            Value::TimeTicks(8675309),
            Value::Counter64(u64::MAX),
            Value::Opaque(Bytes::from_static(&[0xDE, 0xAD])),
        ] {
            assert_eq!(roundtrip(v.clone()), v);
        }
    }

    #[test]
    fn test_exception_values_roundtrip() {
        for v in [Value::NoSuchObject, Value::NoSuchInstance, Value::EndOfMibView] {
            assert_eq!(roundtrip(v.clone()), v);
            assert!(v.is_exception());
        }
    }

    #[test]
    fn test_oid_value_roundtrip() {
        let v = Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1, 8072, 3, 2, 10));
        assert_eq!(roundtrip(v.clone()), v);
    }

    #[test]
    fn test_unknown_tag_passthrough() {
        // 0x47 is not a tag we recognize
        let mut dec = Decoder::from_slice(&[0x47, 0x02, 0xAB, 0xCD]);
        let v = Value::decode(&mut dec).unwrap();
        assert_eq!(
            v,
            Value::Unknown {
                tag: 0x47,
                data: Bytes::from_static(&[0xAB, 0xCD])
            }
        );
        assert_eq!(v.to_string(), "Unknown(tag=0x47, data=0xabcd)");
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Integer(-7).to_string(), "-7");
        assert_eq!(
            Value::OctetString(Bytes::from_static(b"hello")).to_string(),
            "hello"
        );
        assert_eq!(
            Value::OctetString(Bytes::from_static(&[0xFF, 0xFE])).to_string(),
            "0xfffe"
        );
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::IpAddress([10, 0, 0, 1]).to_string(), "10.0.0.1");
        assert_eq!(Value::TimeTicks(8640000).to_string(), "1d 0h 0m 0s");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Integer(42).as_i64(), Some(42));
        assert_eq!(Value::Counter32(42).as_i64(), None);
        assert_eq!(Value::Counter64(42).as_u64(), Some(42));
        assert_eq!(Value::Integer(-1).as_u64(), None);
        assert_eq!(
            Value::OctetString(Bytes::from_static(b"x")).as_str(),
            Some("x")
        );
    }
}
