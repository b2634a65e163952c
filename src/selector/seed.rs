use serde::{Deserialize, Serialize};

use super::DateKey;

/// Length of the seed cycle in days
pub const CYCLE_DAYS: i64 = 365;

pub const DEFAULT_DAY_PRIME: u64 = 7919;
pub const DEFAULT_SLOT_PRIME: u64 = 9973;

/// Constants of the seeded index formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedParams {
    pub epoch: DateKey,
    pub day_prime: u64,
    pub slot_prime: u64,
}

impl Default for SeedParams {
    fn default() -> Self {
        Self {
            epoch: DateKey::default_epoch(),
            day_prime: DEFAULT_DAY_PRIME,
            slot_prime: DEFAULT_SLOT_PRIME,
        }
    }
}

/// Deterministic starting index into a pool of `pool_size` items
///
/// `cycle_day * day_prime + slot * slot_prime (mod pool_size)`, where
/// `cycle_day` is the day distance from the epoch folded into a 365-day cycle.
/// Large primes keep adjacent days from landing on adjacent pool entries.
///
/// `pool_size` must be non-zero; pools are validated at construction.
pub fn seed_index(date: DateKey, slot: u32, pool_size: usize, params: &SeedParams) -> usize {
    debug_assert!(pool_size > 0);
    let cycle_day = date.days_since(params.epoch).rem_euclid(CYCLE_DAYS) as u64;
    let n = pool_size as u64;

    // reduce each term first so the sum cannot overflow
    let day_term = (cycle_day % n) * (params.day_prime % n) % n;
    let slot_term = (slot as u64 % n) * (params.slot_prime % n) % n;
    ((day_term + slot_term) % n) as usize
}
