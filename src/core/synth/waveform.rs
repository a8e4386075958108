use std::f32::consts::PI;

use crate::core::params::Waveform;

impl Waveform {
    /// One sample of the waveform at `phase` in `0.0..1.0`
    pub fn sample(&self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Square => if phase < 0.5 { 1.0 } else { -1.0 },
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    -4.0 + 4.0 * phase
                }
            }
        }
    }

    /// `[phase, value]` pairs over one cycle, for plotting
    pub fn preview(&self, points: usize) -> Vec<[f32; 2]> {
        (0..points)
            .map(|i| {
                let phase = i as f32 / points as f32;
                [phase, self.sample(phase)]
            })
            .collect()
    }
}
