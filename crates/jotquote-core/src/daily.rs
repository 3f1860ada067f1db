//! Quote of the day
//!
//! The daily pick is reproducible: for a given number of quotes, a given
//! calendar day always maps to the same quote, on every machine and across
//! releases. It works like this:
//!
//! 1. Count whole days elapsed since 2016-01-01.
//! 2. Shuffle the index range `0..N` with a Fisher-Yates shuffle driven by a
//!    32-bit Mersenne Twister (MT19937) seeded with the key array `[0]`.
//! 3. Take the shuffled index at position `days % N`.
//!
//! The generator, seeding and the "draw `k` bits, retry while `>= n`" bounded
//! draw are bit-compatible with the existing deployments of this tool, so the
//! quote shown on a given day does not change after an upgrade.

use chrono::{Datelike, Local, NaiveDate};

/// Days from 0001-01-01 (day 1) to 2016-01-01
const EPOCH_DAYS_FROM_CE: i64 = 735_964;

/// Whole days elapsed between 2016-01-01 and `date`
pub fn days_since_epoch(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - EPOCH_DAYS_FROM_CE
}

/// Index of the quote of the day for `count` quotes, `None` if there are none
pub fn daily_index(days_since_epoch: i64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let position = days_since_epoch.rem_euclid(count as i64) as usize;
    Some(shuffled_indices(count)[position])
}

/// Index of today's quote, using the local calendar date
pub fn todays_index(count: usize) -> Option<usize> {
    daily_index(days_since_epoch(Local::now().date_naive()), count)
}

/// The fixed permutation of `0..count` used by the daily pick
pub fn shuffled_indices(count: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..count).collect();
    let mut rng = Mt19937::from_key(&[0]);
    for i in (1..count).rev() {
        let j = rng.below(i as u64 + 1) as usize;
        indices.swap(i, j);
    }
    indices
}

const N: usize = 624;
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

/// 32-bit Mersenne Twister
struct Mt19937 {
    state: [u32; N],
    index: usize,
}

impl Mt19937 {
    fn from_seed(seed: u32) -> Self {
        let mut state = [0u32; N];
        state[0] = seed;
        for i in 1..N {
            let prev = state[i - 1];
            state[i] = 1_812_433_253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        Self { state, index: N }
    }

    /// `init_by_array` seeding from the reference implementation
    fn from_key(key: &[u32]) -> Self {
        let mut mt = Self::from_seed(19_650_218);
        let state = &mut mt.state;
        let (mut i, mut j) = (1usize, 0usize);

        for _ in 0..N.max(key.len()) {
            let prev = state[i - 1];
            state[i] = (state[i] ^ (prev ^ (prev >> 30)).wrapping_mul(1_664_525))
                .wrapping_add(key[j])
                .wrapping_add(j as u32);
            i += 1;
            j += 1;
            if i >= N {
                state[0] = state[N - 1];
                i = 1;
            }
            if j >= key.len() {
                j = 0;
            }
        }
        for _ in 0..N - 1 {
            let prev = state[i - 1];
            state[i] = (state[i] ^ (prev ^ (prev >> 30)).wrapping_mul(1_566_083_941))
                .wrapping_sub(i as u32);
            i += 1;
            if i >= N {
                state[0] = state[N - 1];
                i = 1;
            }
        }
        state[0] = UPPER_MASK;
        mt
    }

    fn next_u32(&mut self) -> u32 {
        if self.index >= N {
            self.twist();
        }
        let mut y = self.state[self.index];
        self.index += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^ (y >> 18)
    }

    fn twist(&mut self) {
        for k in 0..N {
            let y = (self.state[k] & UPPER_MASK) | (self.state[(k + 1) % N] & LOWER_MASK);
            let mag = if y & 1 == 1 { MATRIX_A } else { 0 };
            self.state[k] = self.state[(k + M) % N] ^ (y >> 1) ^ mag;
        }
        self.index = 0;
    }

    /// Draw `bits` random bits (1..=64), least significant word first
    fn random_bits(&mut self, bits: u32) -> u64 {
        if bits <= 32 {
            return u64::from(self.next_u32() >> (32 - bits));
        }
        let low = u64::from(self.next_u32());
        let high = u64::from(self.next_u32() >> (64 - bits));
        (high << 32) | low
    }

    /// Uniform value in `0..n` by rejection sampling, `n > 0`
    fn below(&mut self, n: u64) -> u64 {
        let bits = u64::BITS - n.leading_zeros();
        let mut r = self.random_bits(bits);
        while r >= n {
            r = self.random_bits(bits);
        }
        r
    }
}
