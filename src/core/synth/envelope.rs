use crate::core::params::Envelope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Attack,
    Decay,
    Sustain,
    Release,
    Idle,
}

/// Per-voice ADSR generator.
///
/// Linear segments; release always starts from the current level so an
/// early note-off never jumps.
#[derive(Debug, Clone)]
pub struct EnvelopeGenerator {
    settings: Envelope,
    stage: EnvelopeStage,
    level: f32,
    release_start: f32,
    sample_period: f32,
}

impl EnvelopeGenerator {
    pub fn new(settings: Envelope, sample_rate: f32) -> Self {
        Self {
            settings,
            stage: EnvelopeStage::Attack,
            level: 0.0,
            release_start: 0.0,
            sample_period: 1.0 / sample_rate,
        }
    }

    pub fn set_settings(&mut self, settings: Envelope) {
        self.settings = settings;
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_releasing(&self) -> bool {
        matches!(self.stage, EnvelopeStage::Release | EnvelopeStage::Idle)
    }

    pub fn is_finished(&self) -> bool {
        self.stage == EnvelopeStage::Idle
    }

    pub fn note_off(&mut self) {
        match self.stage {
            EnvelopeStage::Release | EnvelopeStage::Idle => {}
            _ if self.level <= 0.0 => self.stage = EnvelopeStage::Idle,
            _ => {
                self.release_start = self.level;
                self.stage = EnvelopeStage::Release;
            }
        }
    }

    pub fn next(&mut self) -> f32 {
        let dt = self.sample_period;
        let Envelope { attack, decay, sustain, release } = self.settings;

        match self.stage {
            EnvelopeStage::Attack => {
                self.level = if attack <= dt { 1.0 } else { self.level + dt / attack };
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }
            EnvelopeStage::Decay => {
                self.level = if decay <= dt {
                    sustain
                } else {
                    self.level - (1.0 - sustain) * dt / decay
                };
                if self.level <= sustain {
                    self.level = sustain;
                    self.stage = EnvelopeStage::Sustain;
                }
            }
            EnvelopeStage::Sustain => self.level = sustain,
            EnvelopeStage::Release => {
                self.level = if release <= dt {
                    0.0
                } else {
                    self.level - self.release_start * dt / release
                };
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
            EnvelopeStage::Idle => self.level = 0.0,
        }

        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: f32 = 1000.0;

    fn run(env: &mut EnvelopeGenerator, samples: usize) -> f32 {
        let mut last = 0.0;
        for _ in 0..samples {
            last = env.next();
        }
        last
    }

    #[test]
    fn test_adsr_shape() {
        let settings = Envelope { attack: 0.01, decay: 0.01, sustain: 0.5, release: 0.02 };
        let mut env = EnvelopeGenerator::new(settings, RATE);

        let level = run(&mut env, 12);
        assert_eq!(env.stage(), EnvelopeStage::Decay);
        assert!(level > 0.85 && level < 1.0);

        run(&mut env, 15);
        assert_eq!(env.stage(), EnvelopeStage::Sustain);
        assert_eq!(env.level(), 0.5);

        env.note_off();
        assert_eq!(env.stage(), EnvelopeStage::Release);
        run(&mut env, 25);
        assert!(env.is_finished());
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn test_release_during_attack_starts_from_current_level() {
        let settings = Envelope { attack: 0.1, decay: 0.1, sustain: 0.8, release: 0.01 };
        let mut env = EnvelopeGenerator::new(settings, RATE);

        let level = run(&mut env, 20);
        assert!(level > 0.15 && level < 0.25);

        env.note_off();
        let next = env.next();
        assert!(next < level);
        assert!(next > 0.0);
    }

    #[test]
    fn test_zero_times_jump() {
        let settings = Envelope { attack: 0.0, decay: 0.0, sustain: 0.3, release: 0.0 };
        let mut env = EnvelopeGenerator::new(settings, RATE);

        assert_eq!(env.next(), 1.0);
        assert_eq!(env.next(), 0.3);
        env.note_off();
        assert_eq!(env.next(), 0.0);
        assert!(env.is_finished());
    }

    #[test]
    fn test_note_off_before_first_sample_finishes() {
        let mut env = EnvelopeGenerator::new(Envelope::default(), RATE);
        env.note_off();
        assert!(env.is_finished());
    }
}
