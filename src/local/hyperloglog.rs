use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

// 2^14 registers: ~16 KiB of state, standard error 1.04 / sqrt(2^14) ≈ 0.8%.
const REGISTER_BITS: u32 = 14;
const REGISTER_COUNT: usize = 1 << REGISTER_BITS;

/// Dense HyperLogLog sketch over string members.
///
/// Classic Flajolet et al. estimator: the top [`REGISTER_BITS`] bits of a
/// 64-bit hash pick a register, the rank of the remaining bits (position of
/// the first set bit) is max-merged into it. Small-range estimates fall back
/// to linear counting, which makes tiny cardinalities exact in practice.
#[derive(Clone, Debug)]
pub(crate) struct HyperLogLog {
    registers: Vec<u8>,
}

impl HyperLogLog {
    pub(crate) fn new() -> Self {
        Self {
            registers: vec![0; REGISTER_COUNT],
        }
    }

    pub(crate) fn add(&mut self, member: &str) {
        let hash = hash64(member);

        let index = (hash >> (64 - REGISTER_BITS)) as usize;
        let suffix = hash << REGISTER_BITS;

        // Rank of an all-zero suffix would be 65; cap at the suffix width + 1.
        let rank = (suffix.leading_zeros() + 1).min(64 - REGISTER_BITS + 1) as u8;

        if rank > self.registers[index] {
            self.registers[index] = rank;
        }
    }

    pub(crate) fn count(&self) -> u64 {
        let m = REGISTER_COUNT as f64;

        let sum: f64 = self
            .registers
            .iter()
            .map(|&rank| 2f64.powi(-i32::from(rank)))
            .sum();

        let alpha = 0.7213 / (1.0 + 1.079 / m);
        let raw = alpha * m * m / sum;

        let zero_registers = self.registers.iter().filter(|&&rank| rank == 0).count();

        let estimate = if raw <= 2.5 * m && zero_registers > 0 {
            // Linear counting for the small range.
            m * (m / zero_registers as f64).ln()
        } else {
            raw
        };

        estimate.round() as u64
    } // end method count
}

fn hash64(member: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    member.hash(&mut hasher);
    hasher.finish()
}
