//! Coordinate-hashing core: an avalanching 64-bit mix function plus the
//! bit-pattern encoding that turns any supported coordinate into hash input.
//! Everything else in the crate derives from `mix64`.

use crate::error::{Error, Result};

/// Golden-ratio-derived odd constant, used to decorrelate sequential
/// coordinate positions in the variadic hash fold.
pub const GOLDEN64: u64 = 0x9e37_79b9_7f4a_7c15;

/// 32-bit golden-ratio analogue, used to decorrelate fBM octaves.
pub const GOLDEN32: u32 = 0x9e37_79b1;

/// Second mixing constant for combining 2D lattice cell coordinates.
pub(crate) const CELL2: u64 = 0xc2b2_ae3d_27d4_eb4f;

/// Avalanching 64-bit mix of a value and a seed/state, xxh3-style.
/// All arithmetic wraps; a one-bit input change flips about half of the
/// output bits. Pure and deterministic.
#[inline]
pub fn mix64(v: u64, state: u64) -> u64 {
    let mut x = (v ^ (0x1cad_21f7_2c81_017c ^ 0xdb97_9083_e96d_d4de)).wrapping_add(state);
    x ^= x.rotate_left(49) ^ x.rotate_left(24);
    x = x.wrapping_mul(0x9fb2_1c65_1e98_df25);
    x ^= (x >> 35).wrapping_add(4);
    x = x.wrapping_mul(0x9fb2_1c65_1e98_df25);
    x ^ (x >> 28)
}

/// A coordinate in one of the supported numeric representations.
///
/// Encoding preserves bit patterns, not numeric values: floats hash by their
/// IEEE bits (so `-0.0` and `+0.0` hash differently) and signed integers by
/// their two's-complement pattern at their own width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coord {
    F32(f32),
    F64(f64),
    U16(u16),
    U32(u32),
    U64(u64),
    I16(i16),
    I32(i32),
    I64(i64),
}

impl Coord {
    /// Canonical 64-bit pattern for hashing.
    #[inline]
    pub fn to_bits(self) -> u64 {
        match self {
            Coord::F32(v) => v.to_bits() as u64,
            Coord::F64(v) => v.to_bits(),
            Coord::U16(v) => v as u64,
            Coord::U32(v) => v as u64,
            Coord::U64(v) => v,
            Coord::I16(v) => v as u16 as u64,
            Coord::I32(v) => v as u32 as u64,
            Coord::I64(v) => v as u64,
        }
    }
}

macro_rules! coord_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Coord {
            #[inline]
            fn from(v: $ty) -> Self {
                Coord::$variant(v)
            }
        })*
    };
}

coord_from! {
    f32 => F32, f64 => F64,
    u16 => U16, u32 => U32, u64 => U64,
    i16 => I16, i32 => I32, i64 => I64,
}

/// Folds a seed and one or more coordinates into a single 64-bit hash.
/// Position matters: coordinate `i` is mixed against the running state
/// offset by `i * GOLDEN64`, so swapping two coordinates changes the hash.
pub fn hash_coords(seed: u32, coords: &[Coord]) -> Result<u64> {
    if coords.is_empty() {
        return Err(Error::EmptyCoordinates);
    }
    let mut state = seed as u64;
    for (i, c) in coords.iter().enumerate() {
        state = mix64(
            c.to_bits(),
            state.wrapping_add((i as u64).wrapping_mul(GOLDEN64)),
        );
    }
    Ok(state)
}

/// Combines a 2D integer lattice cell into one hashable key.
#[inline]
pub(crate) fn cell_key2(ix: i32, iy: i32) -> u64 {
    (ix as i64 as u64).wrapping_mul(GOLDEN64) ^ (iy as i64 as u64).wrapping_mul(CELL2)
}
