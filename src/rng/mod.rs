//! Secure uniform sampling
//!
//! [`SecureRng`] pulls one byte at a time from a cryptographic byte source and
//! hands it out bit by bit. Integers in an inclusive range are drawn by
//! rejection sampling on the minimum number of bits covering the range, so
//! there is no modulo bias.

use rand::rngs::OsRng;
use rand::RngCore;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::error::{Result, TrainerError};

/// Number of mantissa bits used for uniform floats
const FLOAT_BITS: u32 = 53;

/// Bit-buffered uniform sampler over a byte source
#[derive(Debug)]
pub struct SecureRng<R: RngCore> {
    source: R,
    buffer: u8,
    /// Bits of `buffer` not yet handed out
    remaining: u8,
}

impl SecureRng<OsRng> {
    /// Sampler backed by the operating system's CSPRNG
    ///
    /// Probes the source once so an unavailable source is reported at startup
    /// instead of on first use.
    pub fn from_os() -> Result<Self> {
        let mut probe = [0u8; 1];
        OsRng
            .try_fill_bytes(&mut probe)
            .map_err(|e| TrainerError::RngUnavailable(e.to_string()))?;
        Ok(Self::new(OsRng))
    }
}

impl SecureRng<ChaCha8Rng> {
    /// Deterministic sampler for replays and tests
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: RngCore> SecureRng<R> {
    pub fn new(source: R) -> Self {
        Self { source, buffer: 0, remaining: 0 }
    }

    /// Next uniformly random bit
    pub fn next_bit(&mut self) -> bool {
        if self.remaining == 0 {
            let mut byte = [0u8; 1];
            self.source.fill_bytes(&mut byte);
            self.buffer = byte[0];
            self.remaining = 8;
        }
        let bit = self.buffer & 1 == 1;
        self.buffer >>= 1;
        self.remaining -= 1;
        bit
    }

    fn next_bits(&mut self, count: u32) -> u64 {
        (0..count).fold(0u64, |acc, _| (acc << 1) | self.next_bit() as u64)
    }

    /// Uniform integer in `lower..=upper`
    ///
    /// Panics if `lower > upper`.
    pub fn uniform(&mut self, lower: u64, upper: u64) -> u64 {
        assert!(lower <= upper, "empty range {}..={}", lower, upper);
        let span = upper - lower;
        let bits = u64::BITS - span.leading_zeros();
        loop {
            let draw = self.next_bits(bits);
            if draw <= span {
                return lower + draw;
            }
        }
    }

    /// Uniform index in `0..len`
    pub fn index(&mut self, len: usize) -> usize {
        assert!(len > 0, "cannot pick from an empty range");
        self.uniform(0, (len - 1) as u64) as usize
    }

    /// Uniform float in `[0, 1)`
    pub fn uniform_f64(&mut self) -> f64 {
        self.next_bits(FLOAT_BITS) as f64 / (1u64 << FLOAT_BITS) as f64
    }

    /// Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.uniform(0, i as u64) as usize;
            items.swap(i, j);
        }
    }

    /// Uniformly chosen element, `None` for an empty slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.index(items.len())])
        }
    }
}
