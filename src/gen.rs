use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::category::{Product, Region};
use crate::models::SalesRecord;

pub const DEFAULT_RECORDS: usize = 1_000_000;
pub const DEFAULT_SEED: u64 = 42;
const SAMPLE_YEAR: i32 = 2024;

#[derive(Clone, Debug)]
pub struct SampleConfig {
    pub records: usize,
    /// Seed for the shuffle, `None` keeps generation order.
    pub shuffle: Option<u64>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        SampleConfig {
            records: DEFAULT_RECORDS,
            shuffle: Some(DEFAULT_SEED),
        }
    }
}

impl SampleConfig {
    pub fn new(records: usize) -> Self {
        SampleConfig {
            records,
            ..Default::default()
        }
    }

    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.shuffle = Some(seed);
        self
    }

    pub fn without_shuffle(mut self) -> Self {
        self.shuffle = None;
        self
    }
}

/// The `i`-th record of the cycling dataset: regions and products advance in
/// lockstep with `i`, so group (r, p) receives every index congruent to a
/// single residue modulo 20.
pub fn sample_record(i: usize) -> SalesRecord {
    let region = Region::ALL[i % Region::ALL.len()];
    let product = Product::ALL[i % Product::ALL.len()];
    let month = 1 + (i % 12) as u32;
    let day = 1 + (i % 28) as u32;
    let date = NaiveDate::from_ymd_opt(SAMPLE_YEAR, month, day).unwrap_or_default();
    SalesRecord::new(
        region.name(),
        product.name(),
        100.0 + 10.0 * i as f64,
        1 + (i % 10) as u64,
        date,
    )
}

pub fn generate(config: &SampleConfig) -> Vec<SalesRecord> {
    let mut records: Vec<_> = (0..config.records).map(sample_record).collect();
    if let Some(seed) = config.shuffle {
        let mut rng = StdRng::seed_from_u64(seed);
        records.shuffle(&mut rng);
    }
    records
}
