use std::f32::consts::PI;

pub const MIN_CUTOFF_HZ: f32 = 20.0;
pub const MIN_RESONANCE: f32 = 0.1;

/// Resonant low-pass filter (trapezoidal state-variable form).
///
/// Coefficients are recomputed only when cutoff or Q actually change, which
/// during a glide is every sample.
#[derive(Debug, Clone)]
pub struct LowPassFilter {
    sample_rate: f32,
    cutoff: f32,
    resonance: f32,
    a1: f32,
    a2: f32,
    a3: f32,
    k: f32,
    ic1eq: f32,
    ic2eq: f32,
}

impl LowPassFilter {
    pub fn new(sample_rate: f32, cutoff: f32, resonance: f32) -> Self {
        let mut filter = Self {
            sample_rate,
            cutoff: f32::NAN,
            resonance: f32::NAN,
            a1: 0.0,
            a2: 0.0,
            a3: 0.0,
            k: 0.0,
            ic1eq: 0.0,
            ic2eq: 0.0,
        };
        filter.set(cutoff, resonance);
        filter
    }

    /// Clamp to a stable range and update coefficients
    pub fn set(&mut self, cutoff: f32, resonance: f32) {
        let cutoff = cutoff.clamp(MIN_CUTOFF_HZ, self.sample_rate * 0.45);
        let resonance = resonance.max(MIN_RESONANCE);
        if cutoff == self.cutoff && resonance == self.resonance {
            return;
        }
        self.cutoff = cutoff;
        self.resonance = resonance;

        let g = (PI * cutoff / self.sample_rate).tan();
        self.k = 1.0 / resonance;
        self.a1 = 1.0 / (1.0 + g * (g + self.k));
        self.a2 = g * self.a1;
        self.a3 = g * self.a2;
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    pub fn process(&mut self, input: f32) -> f32 {
        let v3 = input - self.ic2eq;
        let v1 = self.a1 * self.ic1eq + self.a2 * v3;
        let v2 = self.ic2eq + self.a2 * self.ic1eq + self.a3 * v3;
        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;
        v2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::Waveform;

    const RATE: f32 = 48000.0;

    fn peak_of_sine(filter: &mut LowPassFilter, freq: f32) -> f32 {
        let mut peak: f32 = 0.0;
        for i in 0..(RATE as usize / 4) {
            let phase = (i as f32 * freq / RATE).fract();
            let out = filter.process(Waveform::Sine.sample(phase));
            // Skip the settling period
            if i > RATE as usize / 8 {
                peak = peak.max(out.abs());
            }
        }
        peak
    }

    #[test]
    fn test_passes_low_frequencies() {
        let mut filter = LowPassFilter::new(RATE, 2000.0, 0.707);
        let peak = peak_of_sine(&mut filter, 100.0);
        assert!(peak > 0.95 && peak < 1.05, "peak {}", peak);
    }

    #[test]
    fn test_attenuates_high_frequencies() {
        let mut filter = LowPassFilter::new(RATE, 500.0, 0.707);
        let peak = peak_of_sine(&mut filter, 8000.0);
        assert!(peak < 0.05, "peak {}", peak);
    }

    #[test]
    fn test_resonance_boosts_cutoff() {
        let mut flat = LowPassFilter::new(RATE, 1000.0, 0.707);
        let mut resonant = LowPassFilter::new(RATE, 1000.0, 8.0);
        assert!(peak_of_sine(&mut resonant, 1000.0) > 2.0 * peak_of_sine(&mut flat, 1000.0));
    }

    #[test]
    fn test_clamps_parameters() {
        let filter = LowPassFilter::new(RATE, 1.0e6, 0.0);
        assert_eq!(filter.cutoff(), RATE * 0.45);
        assert_eq!(filter.resonance(), MIN_RESONANCE);

        let filter = LowPassFilter::new(RATE, 1.0, 1.0);
        assert_eq!(filter.cutoff(), MIN_CUTOFF_HZ);
    }
}
