//! Deterministic random values derived from coordinate hashes.
//!
//! Two calling conventions exist on purpose. The functions here take a
//! single opaque `u64` coordinate and hash it as `mix64(x, seed)` — the
//! fast path. The variadic path (`white`, `hash::hash_coords`) folds typed
//! coordinates with per-position golden offsets. The two formulas are not
//! bit-compatible for the same logical input and are kept as two distinct,
//! independently deterministic hash streams.

use crate::error::{Error, Result};
use crate::hash::{Coord, GOLDEN64, hash_coords, mix64};

const INV_2_24: f32 = 1.0 / 16_777_216.0;
const INV_2_31: f32 = 1.0 / 2_147_483_648.0;
const INV_2_53: f64 = 1.0 / 9_007_199_254_740_992.0;
const INV_2_64: f64 = 1.0 / 18_446_744_073_709_551_616.0;

/// Deterministic f32 in [0, 1) from x. Only the top 24 hash bits are used:
/// they convert to f32 exactly, so the result never rounds up to 1.0.
#[inline]
pub fn float32(seed: u32, x: u64) -> f32 {
    let h = mix64(x, seed as u64);
    (h >> 40) as f32 * INV_2_24
}

/// Deterministic f64 in [0, 1) from x. Only the top 53 hash bits are used:
/// they convert to f64 exactly, so the result never rounds up to 1.0.
#[inline]
pub fn float64(seed: u32, x: u64) -> f64 {
    let h = mix64(x, seed as u64);
    (h >> 11) as f64 * INV_2_53
}

/// Deterministic u32 from x.
#[inline]
pub fn uint32(seed: u32, x: u64) -> u32 {
    (mix64(x, seed as u64) >> 32) as u32
}

/// Deterministic u64 from x.
#[inline]
pub fn uint64(seed: u32, x: u64) -> u64 {
    mix64(x, seed as u64)
}

/// Deterministic i32 from x (upper hash bits reinterpreted).
#[inline]
pub fn int32(seed: u32, x: u64) -> i32 {
    uint32(seed, x) as i32
}

/// Deterministic i64 from x (hash bits reinterpreted).
#[inline]
pub fn int64(seed: u32, x: u64) -> i64 {
    mix64(x, seed as u64) as i64
}

/// Deterministic u64 in [0, n) from x. Fails with `InvalidBound` when n = 0.
pub fn uint_n(seed: u32, n: u64, x: u64) -> Result<u64> {
    if n == 0 {
        return Err(Error::InvalidBound);
    }
    Ok(mix64(x, seed as u64) % n)
}

/// Deterministic i64 in [0, n) from x. Fails with `InvalidBound` when n <= 0.
pub fn int_n(seed: u32, n: i64, x: u64) -> Result<i64> {
    if n <= 0 {
        return Err(Error::InvalidBound);
    }
    Ok((mix64(x, seed as u64) % n as u64) as i64)
}

/// Deterministic u64 in [lo, hi] from x. Fails with `InvalidRange` when
/// lo > hi.
pub fn uint_in(seed: u32, lo: u64, hi: u64, x: u64) -> Result<u64> {
    if lo > hi {
        return Err(Error::InvalidRange);
    }
    let h = mix64(x, seed as u64);
    // Span of 2^64 (the full domain) wraps to zero: every hash is in range.
    let span = hi.wrapping_sub(lo).wrapping_add(1);
    if span == 0 {
        return Ok(h);
    }
    Ok(lo + h % span)
}

/// Deterministic i64 in [lo, hi] from x. Fails with `InvalidRange` when
/// lo > hi.
pub fn int_in(seed: u32, lo: i64, hi: i64, x: u64) -> Result<i64> {
    if lo > hi {
        return Err(Error::InvalidRange);
    }
    let h = mix64(x, seed as u64);
    let span = (hi.wrapping_sub(lo) as u64).wrapping_add(1);
    if span == 0 {
        return Ok(h as i64);
    }
    Ok(lo.wrapping_add((h % span) as i64))
}

/// Deterministic normally distributed f64 from x (Box-Muller over two
/// derived hashes).
pub fn norm64(seed: u32, x: u64) -> f64 {
    let h1 = mix64(x, seed as u64);
    let h2 = mix64(h1, (seed as u64).wrapping_add(GOLDEN64));

    let u1 = (h1 as f64 * INV_2_64).max(INV_2_64); // keep the log finite
    let u2 = h2 as f64 * INV_2_64;

    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Deterministic normally distributed f32 from x.
#[inline]
pub fn norm32(seed: u32, x: u64) -> f32 {
    norm64(seed, x) as f32
}

/// Deterministic boolean that is true with probability p. Probabilities
/// outside [0, 1] give the implied constant outcome, never an error.
#[inline]
pub fn roll32(seed: u32, p: f32, x: u64) -> bool {
    float32(seed, x) < p
}

/// Deterministic boolean that is true with probability p.
#[inline]
pub fn roll64(seed: u32, p: f64, x: u64) -> bool {
    float64(seed, x) < p
}

/// Deterministic white noise in [-1, 1) from one or more typed coordinates.
/// Fails with `EmptyCoordinates` when none are given.
pub fn white(seed: u32, coords: &[Coord]) -> Result<f32> {
    let h = hash_coords(seed, coords)?;
    Ok((h >> 32) as f32 * INV_2_31 - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: u32 = 42;
    const X: u64 = 12345;

    #[test]
    fn floats_stay_in_unit_interval() {
        for i in 0..1000 {
            let f = float32(SEED, i);
            assert!((0.0..1.0).contains(&f), "float32 gave {f}");
            let d = float64(SEED, i);
            assert!((0.0..1.0).contains(&d), "float64 gave {d}");
        }
    }

    #[test]
    fn unit_interval_is_half_open_at_the_top() {
        // An all-ones hash is the worst case: the scaled value must still
        // sit strictly below 1.0 rather than rounding up to it.
        assert!((u64::MAX >> 40) as f32 * INV_2_24 < 1.0);
        assert!((u64::MAX >> 11) as f64 * INV_2_53 < 1.0);
    }

    #[test]
    fn bounded_values_stay_below_bound() {
        for i in 0..1000 {
            assert!(uint_n(SEED, 25, i).unwrap() < 25);
            assert!(int_n(SEED, 10, i).unwrap() < 10);
            assert!(int_n(SEED, 10, i).unwrap() >= 0);
        }
    }

    #[test]
    fn zero_or_negative_bound_fails() {
        assert_eq!(uint_n(SEED, 0, X), Err(Error::InvalidBound));
        assert_eq!(int_n(SEED, 0, X), Err(Error::InvalidBound));
        assert_eq!(int_n(SEED, -3, X), Err(Error::InvalidBound));
    }

    #[test]
    fn inclusive_range_respects_bounds() {
        for i in 0..1000 {
            let v = int_in(SEED, -5, 5, i).unwrap();
            assert!((-5..=5).contains(&v), "got {v}");
            let u = uint_in(SEED, 100, 200, i).unwrap();
            assert!((100..=200).contains(&u), "got {u}");
        }
    }

    #[test]
    fn inverted_range_fails() {
        assert_eq!(uint_in(SEED, 20, 10, X), Err(Error::InvalidRange));
        assert_eq!(int_in(SEED, 1, -1, X), Err(Error::InvalidRange));
    }

    #[test]
    fn full_domain_range_is_accepted() {
        assert!(uint_in(SEED, 0, u64::MAX, X).is_ok());
        assert!(int_in(SEED, i64::MIN, i64::MAX, X).is_ok());
    }

    #[test]
    fn outputs_are_deterministic() {
        assert_eq!(float32(SEED, X), float32(SEED, X));
        assert_eq!(uint64(SEED, X), uint64(SEED, X));
        assert_eq!(int32(SEED, X), int32(SEED, X));
        assert_eq!(int64(SEED, X), int64(SEED, X));
        assert_eq!(norm64(SEED, X), norm64(SEED, X));
    }

    #[test]
    fn adjacent_inputs_differ() {
        assert_ne!(float32(SEED, X), float32(SEED, X + 1));
        assert_ne!(uint64(SEED, X), uint64(SEED, X + 1));
        assert_ne!(int64(SEED, X), int64(SEED, X + 1));
        assert_ne!(uint64(SEED, X), uint64(SEED + 1, X));
    }

    #[test]
    fn norm_values_are_reasonable() {
        for i in 0..1000 {
            let v = norm64(SEED, i);
            assert!((-5.0..=5.0).contains(&v), "got {v}");
        }
        let v = norm32(SEED, X);
        assert!((-5.0..=5.0).contains(&v));
    }

    #[test]
    fn roll_acceptance_tracks_probability() {
        let hits32 = (0..1000).filter(|&i| roll32(SEED, 0.3, i)).count();
        assert!((250..350).contains(&hits32), "got {hits32}/1000");

        let hits64 = (0..1000).filter(|&i| roll64(SEED, 0.7, i)).count();
        assert!((650..750).contains(&hits64), "got {hits64}/1000");
    }

    #[test]
    fn roll_degenerate_probabilities() {
        assert!(!roll64(SEED, 0.0, X));
        assert!(!roll64(SEED, -2.0, X));
        assert!(roll64(SEED, 1.5, X));
    }

    #[test]
    fn white_stays_in_signed_unit_interval() {
        for i in 0..200 {
            let v = white(SEED, &[Coord::F32(i as f32), Coord::F32(0.5)]).unwrap();
            assert!((-1.0..1.0).contains(&v), "got {v}");
        }
    }

    #[test]
    fn white_varies_with_coordinate_count() {
        let v1 = white(SEED, &[Coord::F32(1.0)]).unwrap();
        let v2 = white(SEED, &[Coord::F32(1.0), Coord::F32(2.0)]).unwrap();
        let v3 = white(
            SEED,
            &[Coord::F32(1.0), Coord::F32(2.0), Coord::F32(3.0)],
        )
        .unwrap();
        assert_ne!(v1, v2);
        assert_ne!(v2, v3);
    }

    #[test]
    fn white_rejects_empty() {
        assert_eq!(white(SEED, &[]), Err(Error::EmptyCoordinates));
    }

    #[test]
    fn white_accepts_mixed_coordinate_kinds() {
        let v = white(SEED, &[Coord::I32(-4), Coord::U64(9), Coord::F64(0.25)]).unwrap();
        assert!((-1.0..1.0).contains(&v));
    }
}
