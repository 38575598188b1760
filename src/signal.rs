//! Synthetic amplitude source: a precomputed pseudo-random table
//! consumed cyclically, standing in for real audio capture.

use noise::{NoiseFn, Perlin};

use crate::params::SignalParams;

/// Sampling stride through the noise field; a non-integer step keeps the
/// samples off the Perlin lattice (integer coordinates are all zero)
const NOISE_STRIDE: f64 = 0.7317;

/// Cyclic source of synthetic amplitude samples in `[0, scale]`
pub struct SignalSource {
    table: Vec<f32>,
    index: usize,
    scale: f32,
}

impl SignalSource {
    /// Precompute the sample table from a seeded noise field
    pub fn new(params: &SignalParams) -> Self {
        let perlin = Perlin::new(params.seed);
        let table = (0..params.table_len.max(1))
            .map(|i| {
                let v = perlin.get([i as f64 * NOISE_STRIDE, 0.5]) as f32;
                // Map roughly [-1, 1] noise into [0, 1]
                (v * 0.5 + 0.5).clamp(0.0, 1.0)
            })
            .collect();

        Self {
            table,
            index: 0,
            scale: params.scale,
        }
    }

    /// Next sample, wrapping back to the start of the table when exhausted
    pub fn next_sample(&mut self) -> f32 {
        if self.index >= self.table.len() {
            self.index = 0;
        }
        let value = self.table[self.index];
        self.index += 1;
        value * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_stay_in_range() {
        let params = SignalParams::default();
        let mut source = SignalSource::new(&params);

        for _ in 0..params.table_len * 2 {
            let sample = source.next_sample();
            assert!(sample >= 0.0 && sample <= params.scale);
        }
    }

    #[test]
    fn test_table_repeats_cyclically() {
        let params = SignalParams::default();
        let mut source = SignalSource::new(&params);

        let first_pass: Vec<f32> = (0..params.table_len)
            .map(|_| source.next_sample())
            .collect();
        let second_pass: Vec<f32> = (0..params.table_len)
            .map(|_| source.next_sample())
            .collect();

        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn test_same_seed_same_table() {
        let params = SignalParams::default();
        let mut a = SignalSource::new(&params);
        let mut b = SignalSource::new(&params);

        for _ in 0..100 {
            assert_eq!(a.next_sample(), b.next_sample());
        }
    }

    #[test]
    fn test_table_is_not_constant() {
        let mut source = SignalSource::new(&SignalParams::default());

        let samples: Vec<f32> = (0..100).map(|_| source.next_sample()).collect();
        let first = samples[0];
        assert!(samples.iter().any(|&s| (s - first).abs() > 1.0));
    }
}
