//! Level code encoding
//!
//! Packs everything needed to rebuild a round into one string:
//! `{prefix};{seed};{location};{d0,d1,...,d23}` where each `d` is the slot's
//! intensity rescaled to a single digit.

use crate::permutation::{Permutation, MAX_INTENSITY};

/// Separator between the code's top-level fields
pub const FIELD_DELIMITER: char = ';';

/// Separator between per-obstacle digits
pub const DIGIT_DELIMITER: char = ',';

/// Largest digit an intensity maps to
pub const MAX_DIGIT: u8 = 9;

/// Rescale an intensity from `0..=32` to `0..=9`
///
/// Rounds up so any enabled obstacle stays non-zero.
pub fn scale_intensity(intensity: u8) -> u8 {
    let v = intensity.min(MAX_INTENSITY) as u16;
    let max = MAX_INTENSITY as u16;
    ((v * MAX_DIGIT as u16 + max - 1) / max) as u8
}

/// Encode a finished round
pub fn encode(prefix: &str, seed: u64, location: &str, permutation: &Permutation) -> String {
    let digits: Vec<String> = permutation
        .intensities()
        .iter()
        .map(|&v| scale_intensity(v).to_string())
        .collect();

    format!(
        "{prefix}{d}{seed}{d}{location}{d}{digits}",
        d = FIELD_DELIMITER,
        digits = digits.join(&DIGIT_DELIMITER.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_endpoints() {
        assert_eq!(scale_intensity(0), 0);
        assert_eq!(scale_intensity(1), 1);
        assert_eq!(scale_intensity(32), 9);
        assert_eq!(scale_intensity(16), 5);
    }

    #[test]
    fn test_scale_is_monotone() {
        for v in 1..=MAX_INTENSITY {
            assert!(scale_intensity(v) >= scale_intensity(v - 1));
        }
    }

    #[test]
    fn test_encode_layout() {
        let mut p = Permutation::empty();
        p.set(0, 32);
        p.set(2, 4);
        let code = encode("CK", 1234, "foundry", &p);
        assert_eq!(
            code,
            "CK;1234;foundry;9,0,2,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0"
        );
    }

    #[test]
    fn test_encode_is_deterministic() {
        let mut p = Permutation::empty();
        p.set(11, 17);
        let a = encode("x", 7, "depths", &p);
        let b = encode("x", 7, "depths", &p);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_empty_prefix() {
        let code = encode("", 0, "skyway", &Permutation::empty());
        assert!(code.starts_with(";0;skyway;0,"));
    }
}
