//! Bounded, reproducible column sampling.

use pricemap_model::CellValue;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

pub const DEFAULT_SAMPLE_SIZE: usize = 50;
pub const DEFAULT_SEED: u64 = 42;

/// Draws the values every classifier looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampler {
    pub size: usize,
    pub seed: u64,
}

impl Default for Sampler {
    fn default() -> Self {
        Self {
            size: DEFAULT_SAMPLE_SIZE,
            seed: DEFAULT_SEED,
        }
    }
}

impl Sampler {
    pub fn new(size: usize, seed: u64) -> Self {
        Self { size, seed }
    }

    /// Returns up to `size` non-empty values of `column`, in source order.
    ///
    /// When the column has more non-empty values than `size`, indices are
    /// drawn without replacement from an RNG seeded with `seed`, so the same
    /// column always yields the same sample.
    pub fn sample<'a, I>(&self, column: I) -> Vec<CellValue>
    where
        I: IntoIterator<Item = &'a CellValue>,
    {
        let filled: Vec<&CellValue> = column.into_iter().filter(|cell| !cell.is_empty()).collect();
        if filled.len() <= self.size {
            return filled.into_iter().cloned().collect();
        }
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut picked = index::sample(&mut rng, filled.len(), self.size).into_vec();
        picked.sort_unstable();
        picked.into_iter().map(|i| filled[i].clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cells(values: &[i64]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::Int(*v)).collect()
    }

    #[test]
    fn drops_empty_cells() {
        let column = vec![
            CellValue::Empty,
            CellValue::from("  "),
            CellValue::Int(3),
            CellValue::from("x"),
        ];
        let sample = Sampler::default().sample(&column);
        assert_eq!(sample, vec![CellValue::Int(3), CellValue::from("x")]);
    }

    #[test]
    fn short_columns_are_returned_whole() {
        let column = cells(&[5, 4, 3]);
        assert_eq!(Sampler::new(3, 7).sample(&column), column);
    }

    #[test]
    fn empty_column_gives_empty_sample() {
        let column: Vec<CellValue> = Vec::new();
        assert!(Sampler::default().sample(&column).is_empty());
    }

    proptest! {
        #[test]
        fn sample_is_bounded_distinct_and_ordered(len in 0usize..200, size in 1usize..60, seed in any::<u64>()) {
            let column: Vec<CellValue> = (0..len as i64).map(CellValue::Int).collect();
            let sample = Sampler::new(size, seed).sample(&column);
            prop_assert_eq!(sample.len(), len.min(size));
            let values: Vec<i64> = sample
                .iter()
                .map(|cell| match cell {
                    CellValue::Int(v) => *v,
                    _ => -1,
                })
                .collect();
            prop_assert!(values.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(values.iter().all(|v| (0..len as i64).contains(v)));
        }

        #[test]
        fn sample_is_reproducible(len in 0usize..300, seed in any::<u64>()) {
            let column: Vec<CellValue> = (0..len as i64).map(CellValue::Int).collect();
            let sampler = Sampler::new(50, seed);
            prop_assert_eq!(sampler.sample(&column), sampler.sample(&column));
        }
    }
}
