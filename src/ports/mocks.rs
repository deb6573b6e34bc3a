use std::collections::VecDeque;

use super::random::RandomSource;

/// Random source that replays scripted draws, then repeats a fallback value
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: VecDeque<f64>,
    fallback: f64,
    draws: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback: 0.5,
            draws: 0,
        }
    }

    /// Every draw returns `value`
    pub fn constant(value: f64) -> Self {
        Self::new(Vec::new()).with_fallback(value)
    }

    /// Builder method to set the value returned once the script runs out
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Number of draws taken so far
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Scripted values not yet consumed
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        self.draws += 1;
        self.values.pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_then_fallback() {
        let mut rng = ScriptedRandom::new([0.1, 0.9]).with_fallback(0.25);

        assert_eq!(rng.next_f64(), 0.1);
        assert_eq!(rng.remaining(), 1);
        assert_eq!(rng.next_f64(), 0.9);
        assert_eq!(rng.next_f64(), 0.25);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn test_constant() {
        let mut rng = ScriptedRandom::constant(0.0);
        assert_eq!(rng.next_f64(), 0.0);
        assert_eq!(rng.next_f64(), 0.0);
    }
}
