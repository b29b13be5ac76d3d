//! SNMP version enumeration.

/// SNMP protocol version.
///
/// Only the community-based versions are supported; the version integer is
/// the first field of the message envelope (0 = v1, 1 = v2c).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Version {
    /// SNMPv1 (RFC 1157)
    V1,
    /// SNMPv2c (RFC 1901)
    #[default]
    V2c,
}

impl Version {
    /// Get the wire version number.
    pub const fn as_i64(self) -> i64 {
        match self {
            Version::V1 => 0,
            Version::V2c => 1,
        }
    }

    /// Create from a wire version number.
    pub const fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Version::V1),
            1 => Some(Version::V2c),
            _ => None,
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Version::V1 => write!(f, "SNMPv1"),
            Version::V2c => write!(f, "SNMPv2c"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes() {
        assert_eq!(Version::V1.as_i64(), 0);
        assert_eq!(Version::V2c.as_i64(), 1);
        assert_eq!(Version::from_i64(0), Some(Version::V1));
        assert_eq!(Version::from_i64(1), Some(Version::V2c));
        assert_eq!(Version::from_i64(3), None); // v3 out of scope
    }
}
