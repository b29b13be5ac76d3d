//! Object Identifier (OID) type.
//!
//! OIDs are stored as `SmallVec<[u32; 16]>` to avoid heap allocation for
//! common OIDs. Ordering is lexicographic component-wise, which is the
//! ordering SNMP walks rely on.

use crate::error::{DecodeErrorKind, Error, OidErrorKind, Result};
use smallvec::SmallVec;
use std::fmt;

/// Maximum number of arcs (subidentifiers) allowed in an OID.
///
/// Per RFC 2578 Section 3.5: "there are at most 128 sub-identifiers in a
/// value". Enforced during BER decoding and string parsing.
pub const MAX_OID_LEN: usize = 128;

/// Object Identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    /// Create an empty OID.
    pub fn empty() -> Self {
        Self {
            arcs: SmallVec::new(),
        }
    }

    /// Create an OID from arc values.
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create an OID from a slice of arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse an OID from dotted-numeric notation (e.g. "1.3.6.1.2.1.1.1.0").
    ///
    /// A leading dot is tolerated (net-snmp style). Each component must be a
    /// non-negative integer that fits in u32.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmp_manager::oid::Oid;
    ///
    /// let oid = Oid::parse("1.3.6.1.2.1.1.1.0").unwrap();
    /// assert_eq!(oid.len(), 9);
    /// assert!(Oid::parse("1.3.not.an.oid").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.strip_prefix('.').unwrap_or(s);
        if trimmed.is_empty() {
            return Ok(Self::empty());
        }

        let mut arcs = SmallVec::new();

        for part in trimmed.split('.') {
            let arc: u32 = part
                .parse()
                .map_err(|_| Error::invalid_oid(OidErrorKind::InvalidArc, s))?;
            arcs.push(arc);
            if arcs.len() > MAX_OID_LEN {
                return Err(Error::invalid_oid(
                    OidErrorKind::TooManyArcs {
                        count: arcs.len(),
                        max: MAX_OID_LEN,
                    },
                    s,
                ));
            }
        }

        Ok(Self { arcs })
    }

    /// Get the arc values.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Get the number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Check if the OID is empty.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Check if this OID starts with another OID.
    ///
    /// Used for subtree containment checks: an OID is inside the subtree
    /// rooted at `other` exactly when it starts with `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmp_manager::oid;
    ///
    /// let sys_descr = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
    /// let system = oid!(1, 3, 6, 1, 2, 1, 1);
    /// assert!(sys_descr.starts_with(&system));
    /// assert!(!system.starts_with(&sys_descr));
    /// ```
    pub fn starts_with(&self, other: &Oid) -> bool {
        self.arcs.len() >= other.arcs.len() && self.arcs[..other.arcs.len()] == other.arcs[..]
    }

    /// Create a child OID by appending an arc.
    pub fn child(&self, arc: u32) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.push(arc);
        Oid { arcs }
    }

    /// The last arc, if any.
    pub fn last_arc(&self) -> Option<u32> {
        self.arcs.last().copied()
    }

    /// Validate that the OID has at least two components.
    ///
    /// The wire encoding folds the first two arcs into one subidentifier, so
    /// anything shorter cannot be expressed unambiguously.
    pub fn validate_min_len(&self) -> Result<()> {
        if self.arcs.len() < 2 {
            return Err(Error::invalid_oid(OidErrorKind::TooShort, self.to_string()));
        }
        Ok(())
    }

    /// Encode to BER, returning bytes in a stack-allocated buffer.
    ///
    /// OID encoding (X.690 Section 8.19):
    /// - First two arcs combined as `arc1 * 40 + arc2`, then base-128
    /// - Remaining arcs encoded as base-128 with continuation bits
    pub fn to_ber_smallvec(&self) -> SmallVec<[u8; 64]> {
        let mut bytes = SmallVec::new();

        if self.arcs.is_empty() {
            return bytes;
        }

        // First two arcs fold into the first subidentifier. Base-128 because
        // arc2 can exceed 127 when arc1 = 2.
        if self.arcs.len() >= 2 {
            let first_subid = self.arcs[0] as u64 * 40 + self.arcs[1] as u64;
            encode_subidentifier(&mut bytes, first_subid);
        } else {
            let first_subid = self.arcs[0] as u64 * 40;
            encode_subidentifier(&mut bytes, first_subid);
        }

        if self.arcs.len() > 2 {
            for &arc in &self.arcs[2..] {
                encode_subidentifier(&mut bytes, arc.into());
            }
        }

        bytes
    }

    /// Encode to BER format.
    pub fn to_ber(&self) -> Vec<u8> {
        self.to_ber_smallvec().to_vec()
    }

    /// Decode from BER content bytes.
    ///
    /// Enforces [`MAX_OID_LEN`] per RFC 2578 Section 3.5.
    pub fn from_ber(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self::empty());
        }

        let mut arcs = SmallVec::new();

        // First subidentifier encodes arc1*40 + arc2. When arc1 = 2 the fold
        // can exceed u32 by up to 80, so decode it with the wider limit.
        let (first_subid, consumed) = decode_subidentifier_raw(data, 0, MAX_FIRST_SUBID)?;

        if first_subid < 40 {
            arcs.push(0);
            arcs.push(first_subid as u32);
        } else if first_subid < 80 {
            arcs.push(1);
            arcs.push((first_subid - 40) as u32);
        } else {
            arcs.push(2);
            arcs.push((first_subid - 80) as u32);
        }

        let mut i = consumed;
        while i < data.len() {
            let (arc, bytes_consumed) = decode_subidentifier(&data[i..], i)?;
            arcs.push(arc);
            i += bytes_consumed;

            if arcs.len() > MAX_OID_LEN {
                return Err(Error::decode(
                    i,
                    DecodeErrorKind::OidTooLong {
                        count: arcs.len(),
                        max: MAX_OID_LEN,
                    },
                ));
            }
        }

        Ok(Self { arcs })
    }
}

/// Encode a single subidentifier as base-128 with continuation bits.
///
/// Takes u64 because the folded first subidentifier (`arc1 * 40 + arc2`)
/// can exceed u32 when arc1 = 2 and arc2 is near its limit.
fn encode_subidentifier(out: &mut SmallVec<[u8; 64]>, value: u64) {
    if value == 0 {
        out.push(0);
        return;
    }

    // Up to 10 groups of 7 bits for a u64
    let mut groups = [0u8; 10];
    let mut count = 0;
    let mut v = value;
    while v > 0 {
        groups[count] = (v & 0x7F) as u8;
        v >>= 7;
        count += 1;
    }

    // Emit most-significant first, continuation bit on all but the last
    for i in (1..count).rev() {
        out.push(groups[i] | 0x80);
    }
    out.push(groups[0]);
}

/// Largest legal value for the folded first subidentifier: arc1 = 2 plus a
/// second arc of u32::MAX.
const MAX_FIRST_SUBID: u64 = u32::MAX as u64 + 80;

/// Decode a single base-128 subidentifier, returning (value, bytes consumed).
/// Per-arc values are capped at u32.
fn decode_subidentifier(data: &[u8], base_offset: usize) -> Result<(u32, usize)> {
    let (value, consumed) = decode_subidentifier_raw(data, base_offset, u32::MAX as u64)?;
    Ok((value as u32, consumed))
}

/// Decode a base-128 subidentifier with a caller-supplied upper bound.
fn decode_subidentifier_raw(data: &[u8], base_offset: usize, max: u64) -> Result<(u64, usize)> {
    let mut value: u64 = 0;
    for (i, &byte) in data.iter().enumerate() {
        value = (value << 7) | (byte & 0x7F) as u64;
        if value > max {
            return Err(Error::decode(
                base_offset + i,
                DecodeErrorKind::InvalidOidEncoding,
            ));
        }
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    // Ran out of data with the continuation bit still set
    Err(Error::decode(
        base_offset + data.len(),
        DecodeErrorKind::InvalidOidEncoding,
    ))
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl std::str::FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}

/// Construct an [`Oid`] from literal arcs.
///
/// # Examples
///
/// ```
/// use snmp_manager::oid;
///
/// let sys_descr = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
/// assert_eq!(sys_descr.to_string(), "1.3.6.1.2.1.1.1.0");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),+ $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let oid = Oid::parse("1.3.6.1.2.1.1.1.0").unwrap();
        assert_eq!(oid.arcs(), &[1, 3, 6, 1, 2, 1, 1, 1, 0]);
        assert_eq!(oid.to_string(), "1.3.6.1.2.1.1.1.0");

        // Leading dot tolerated
        let oid = Oid::parse(".1.3.6.1").unwrap();
        assert_eq!(oid.arcs(), &[1, 3, 6, 1]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Oid::parse("1.3.x.1").is_err());
        assert!(Oid::parse("1..3").is_err());
        assert!(Oid::parse("-1.3").is_err());
        assert!(Oid::parse("1.4294967296").is_err()); // > u32::MAX
    }

    #[test]
    fn test_ber_roundtrip_simple() {
        let oid = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
        let ber = oid.to_ber();
        assert_eq!(ber[0], 0x2B); // 1*40 + 3
        assert_eq!(Oid::from_ber(&ber).unwrap(), oid);
    }

    #[test]
    fn test_ber_multibyte_subidentifier() {
        // 2680 = 0x14 0x78 in base-128 -> [0x94, 0x78]
        let oid = oid!(1, 3, 6, 1, 4, 1, 2680, 1, 2, 7, 3, 2, 0);
        let ber = oid.to_ber();
        let decoded = Oid::from_ber(&ber).unwrap();
        assert_eq!(decoded, oid);

        // Largest arc
        let oid = oid!(1, 3, u32::MAX);
        let decoded = Oid::from_ber(&oid.to_ber()).unwrap();
        assert_eq!(decoded, oid);
    }

    #[test]
    fn test_ber_first_subid_split() {
        assert_eq!(Oid::from_ber(&[0x00]).unwrap().arcs(), &[0, 0]);
        assert_eq!(Oid::from_ber(&[0x27]).unwrap().arcs(), &[0, 39]);
        assert_eq!(Oid::from_ber(&[0x28]).unwrap().arcs(), &[1, 0]);
        assert_eq!(Oid::from_ber(&[0x4F]).unwrap().arcs(), &[1, 39]);
        assert_eq!(Oid::from_ber(&[0x50]).unwrap().arcs(), &[2, 0]);
        // arc2 > 39 only valid under arc1 = 2
        let oid = oid!(2, 999);
        assert_eq!(Oid::from_ber(&oid.to_ber()).unwrap(), oid);
    }

    #[test]
    fn test_ber_first_subid_above_u32() {
        // arc1 = 2 folds as 80 + arc2, which overflows u32 near the top of
        // the arc range; the round trip must still hold.
        for oid in [oid!(2, u32::MAX), oid!(2, u32::MAX, 1, 5), oid!(2, 4294967215)] {
            let decoded = Oid::from_ber(&oid.to_ber()).unwrap();
            assert_eq!(decoded, oid);
        }
    }

    #[test]
    fn test_from_ber_first_subid_too_large() {
        // 2^33 as a folded first subidentifier has no (arc1, arc2) preimage
        let err = Oid::from_ber(&[0xA0, 0x80, 0x80, 0x80, 0x00]).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                kind: DecodeErrorKind::InvalidOidEncoding,
                ..
            }
        ));
    }

    #[test]
    fn test_from_ber_dangling_continuation() {
        // Continuation bit set on the final byte
        let err = Oid::from_ber(&[0x2B, 0x86]).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                kind: DecodeErrorKind::InvalidOidEncoding,
                ..
            }
        ));
    }

    #[test]
    fn test_ordering_lexicographic() {
        let a = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
        let b = oid!(1, 3, 6, 1, 2, 1, 1, 2, 0);
        let prefix = oid!(1, 3, 6, 1, 2, 1, 1);
        assert!(a < b);
        assert!(prefix < a); // shorter prefix sorts first
    }

    #[test]
    fn test_starts_with() {
        let sys_descr = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
        let system = oid!(1, 3, 6, 1, 2, 1, 1);
        let interfaces = oid!(1, 3, 6, 1, 2, 1, 2);
        assert!(sys_descr.starts_with(&system));
        assert!(!sys_descr.starts_with(&interfaces));
        assert!(sys_descr.starts_with(&sys_descr));
        assert!(sys_descr.starts_with(&Oid::empty()));
    }

    #[test]
    fn test_validate_min_len() {
        assert!(oid!(1, 3).validate_min_len().is_ok());
        assert!(Oid::from_slice(&[1]).validate_min_len().is_err());
        assert!(Oid::empty().validate_min_len().is_err());
    }

    #[test]
    fn test_max_len_enforced() {
        let long: Vec<u32> = (0..200).collect();
        let s = long
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(".");
        assert!(Oid::parse(&s).is_err());
    }
}
