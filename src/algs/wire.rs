//! Fixed, versioned, little-endian wire format for persistence pairs.
//!
//! Layout: [`WireHdr`] (8 bytes), [`WireCount`] (4 bytes), then one
//! [`WirePairRecord`] (40 bytes) per pair. Records follow a 12-byte prefix,
//! so decoding reads them unaligned.

use bytemuck::{Pod, Zeroable};
use std::mem::{align_of, size_of};

use crate::algs::diagram::PersistencePair;
use crate::persistence_error::PersistenceError;

/// Bump when the layout or semantics change in incompatible ways.
pub const WIRE_VERSION: u16 = 1;

/// Record kind for a stream of persistence pairs.
pub const KIND_PAIRS: u16 = 1;

/// `flags` bit set on essential classes; death fields are then zero.
pub const FLAG_ESSENTIAL: u32 = 1;

/// All multi-byte integers in these structs are **little-endian** on the wire.
/// They are stored pre-LE with `.to_le()` and decoded with `.from_le()`.

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireHdr {
    pub version_le: u16,  // = WIRE_VERSION.to_le()
    pub kind_le: u16,     // KIND_PAIRS
    pub reserved_le: u32, // keep zero
}

impl WireHdr {
    pub fn new(kind: u16) -> Self {
        Self {
            version_le: WIRE_VERSION.to_le(),
            kind_le: kind.to_le(),
            reserved_le: 0,
        }
    }
    pub fn kind(&self) -> u16 {
        u16::from_le(self.kind_le)
    }
    pub fn version(&self) -> u16 {
        u16::from_le(self.version_le)
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireCount {
    pub n_le: u32, // count of following records
}
impl WireCount {
    /// # Errors
    /// [`PersistenceError::WireCount`] if `n` exceeds `u32::MAX`.
    pub fn new(n: usize) -> Result<Self, PersistenceError> {
        let n = u32::try_from(n).map_err(|_| PersistenceError::WireCount(n))?;
        Ok(Self { n_le: n.to_le() })
    }
    pub fn get(&self) -> usize {
        u32::from_le(self.n_le) as usize
    }
}

/// One birth/death pair. Values travel as IEEE-754 bit patterns.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WirePairRecord {
    pub dimension_le: u32,
    pub flags_le: u32,
    pub birth_bits_le: u64,
    pub death_bits_le: u64,
    pub birth_index_le: u64,
    pub death_index_le: u64,
}

impl WirePairRecord {
    pub const SIZE: usize = 40; // 2*4 + 4*8

    pub fn of(pair: &PersistencePair) -> Self {
        let (flags, death, death_index) = match (pair.death, pair.death_index) {
            (Some(d), Some(i)) => (0, d.to_bits(), i as u64),
            _ => (FLAG_ESSENTIAL, 0, 0),
        };
        Self {
            dimension_le: (pair.dimension as u32).to_le(),
            flags_le: flags.to_le(),
            birth_bits_le: pair.birth.to_bits().to_le(),
            death_bits_le: death.to_le(),
            birth_index_le: (pair.birth_index as u64).to_le(),
            death_index_le: death_index.to_le(),
        }
    }

    pub fn decode(&self) -> PairRecord {
        let essential = u32::from_le(self.flags_le) & FLAG_ESSENTIAL != 0;
        PairRecord {
            dimension: u32::from_le(self.dimension_le) as usize,
            birth: f64::from_bits(u64::from_le(self.birth_bits_le)),
            death: (!essential).then(|| f64::from_bits(u64::from_le(self.death_bits_le))),
            birth_index: u64::from_le(self.birth_index_le) as usize,
            death_index: (!essential).then(|| u64::from_le(self.death_index_le) as usize),
        }
    }
}

/// A pair as read back from the wire, without representatives.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PairRecord {
    pub dimension: usize,
    pub birth: f64,
    pub death: Option<f64>,
    pub birth_index: usize,
    pub death_index: Option<usize>,
}

impl From<&PersistencePair> for PairRecord {
    fn from(p: &PersistencePair) -> Self {
        Self {
            dimension: p.dimension,
            birth: p.birth,
            death: p.death,
            birth_index: p.birth_index,
            death_index: p.death_index,
        }
    }
}

const PREFIX: usize = size_of::<WireHdr>() + size_of::<WireCount>();

const _: () = {
    assert!(size_of::<WireHdr>() == 8);
    assert!(size_of::<WireCount>() == 4);
    assert!(size_of::<WirePairRecord>() == WirePairRecord::SIZE);
    assert!(align_of::<WirePairRecord>() == 8);
};

/// Encode `pairs` into a self-describing byte buffer.
///
/// # Errors
/// [`PersistenceError::WireCount`] if there are more than `u32::MAX` pairs.
pub fn encode_pairs<'a>(
    pairs: impl IntoIterator<Item = &'a PersistencePair>,
) -> Result<Vec<u8>, PersistenceError> {
    let records: Vec<WirePairRecord> = pairs.into_iter().map(WirePairRecord::of).collect();
    let count = WireCount::new(records.len())?;
    let mut out = Vec::with_capacity(PREFIX + records.len() * WirePairRecord::SIZE);
    out.extend_from_slice(bytemuck::bytes_of(&WireHdr::new(KIND_PAIRS)));
    out.extend_from_slice(bytemuck::bytes_of(&count));
    out.extend_from_slice(bytemuck::cast_slice(&records));
    Ok(out)
}

/// Decode a buffer produced by [`encode_pairs`].
///
/// # Errors
/// * [`PersistenceError::WireLength`] if the buffer is truncated or has trailing bytes.
/// * [`PersistenceError::WireVersion`] on a version other than [`WIRE_VERSION`].
/// * [`PersistenceError::WireKind`] if the header is not [`KIND_PAIRS`].
pub fn decode_pairs(bytes: &[u8]) -> Result<Vec<PairRecord>, PersistenceError> {
    if bytes.len() < PREFIX {
        return Err(PersistenceError::WireLength {
            expected: PREFIX,
            found: bytes.len(),
        });
    }
    let hdr: WireHdr = bytemuck::pod_read_unaligned(&bytes[..size_of::<WireHdr>()]);
    if hdr.version() != WIRE_VERSION {
        return Err(PersistenceError::WireVersion {
            expected: WIRE_VERSION,
            found: hdr.version(),
        });
    }
    if hdr.kind() != KIND_PAIRS {
        return Err(PersistenceError::WireKind(hdr.kind()));
    }
    let count: WireCount = bytemuck::pod_read_unaligned(&bytes[size_of::<WireHdr>()..PREFIX]);
    let expected = PREFIX + count.get() * WirePairRecord::SIZE;
    if bytes.len() != expected {
        return Err(PersistenceError::WireLength {
            expected,
            found: bytes.len(),
        });
    }
    Ok(bytes[PREFIX..]
        .chunks_exact(WirePairRecord::SIZE)
        .map(|chunk| bytemuck::pod_read_unaligned::<WirePairRecord>(chunk).decode())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::simplex::Simplex;

    fn pairs() -> Vec<PersistencePair> {
        vec![
            PersistencePair {
                dimension: 0,
                birth: 0.0,
                death: None,
                birth_index: 0,
                death_index: None,
                cycle: vec![Simplex::vertex(0u32)],
                chain: vec![],
            },
            PersistencePair {
                dimension: 1,
                birth: 0.75,
                death: Some(1.5),
                birth_index: 7,
                death_index: Some(12),
                cycle: vec![],
                chain: vec![],
            },
        ]
    }

    #[test]
    fn encode_then_decode_keeps_values() {
        let ps = pairs();
        let bytes = encode_pairs(&ps).unwrap();
        assert_eq!(bytes.len(), PREFIX + 2 * WirePairRecord::SIZE);
        let back = decode_pairs(&bytes).unwrap();
        let expected: Vec<PairRecord> = ps.iter().map(PairRecord::from).collect();
        assert_eq!(back, expected);
    }

    #[test]
    fn layout_is_little_endian() {
        let bytes = encode_pairs(&pairs()[1..]).unwrap();
        assert_eq!(&bytes[..2], &[1, 0]); // version
        assert_eq!(&bytes[2..4], &[1, 0]); // kind
        assert_eq!(&bytes[8..12], &[1, 0, 0, 0]); // count
        assert_eq!(&bytes[12..16], &[1, 0, 0, 0]); // dimension
        assert_eq!(&bytes[16..20], &[0, 0, 0, 0]); // flags
        assert_eq!(&bytes[20..28], &0.75f64.to_bits().to_le_bytes());
    }

    #[test]
    fn rejects_bad_streams() {
        let bytes = encode_pairs(&pairs()).unwrap();

        assert!(matches!(
            decode_pairs(&bytes[..bytes.len() - 1]),
            Err(PersistenceError::WireLength { .. })
        ));
        assert!(matches!(
            decode_pairs(&bytes[..4]),
            Err(PersistenceError::WireLength { expected: 12, found: 4 })
        ));

        let mut wrong_version = bytes.clone();
        wrong_version[0] = 9;
        assert_eq!(
            decode_pairs(&wrong_version),
            Err(PersistenceError::WireVersion {
                expected: WIRE_VERSION,
                found: 9
            })
        );

        let mut wrong_kind = bytes;
        wrong_kind[2] = 3;
        assert_eq!(decode_pairs(&wrong_kind), Err(PersistenceError::WireKind(3)));
    }

    #[test]
    fn empty_stream() {
        let bytes = encode_pairs(&[]).unwrap();
        assert_eq!(bytes.len(), PREFIX);
        assert!(decode_pairs(&bytes).unwrap().is_empty());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn count_past_u32_is_rejected() {
        let too_many = u32::MAX as usize + 1;
        assert_eq!(
            WireCount::new(too_many).unwrap_err(),
            PersistenceError::WireCount(too_many)
        );
        assert_eq!(WireCount::new(u32::MAX as usize).unwrap().get(), u32::MAX as usize);
    }
}
