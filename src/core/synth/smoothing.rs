/// Linear glide towards a target value.
///
/// Setting a new target restarts the ramp from wherever the value is now, so
/// rapid slider movement never produces a step.
#[derive(Debug, Clone)]
pub struct LinearRamp {
    current: f32,
    target: f32,
    step: f32,
    remaining: usize,
}

impl LinearRamp {
    pub fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
            step: 0.0,
            remaining: 0,
        }
    }

    /// Glide to `target` over `duration_samples`. Zero jumps immediately.
    pub fn set_target(&mut self, target: f32, duration_samples: usize) {
        self.target = target;
        if duration_samples == 0 {
            self.current = target;
            self.remaining = 0;
            return;
        }
        self.remaining = duration_samples;
        self.step = (target - self.current) / duration_samples as f32;
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn is_gliding(&self) -> bool {
        self.remaining > 0
    }

    pub fn next(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.current = if self.remaining == 0 { self.target } else { self.current + self.step };
        }
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_reaches_target() {
        let mut ramp = LinearRamp::new(100.0);
        ramp.set_target(200.0, 10);

        let first = ramp.next();
        assert!((first - 110.0).abs() < 1e-3);
        assert!(ramp.is_gliding());

        for _ in 0..9 {
            ramp.next();
        }
        assert_eq!(ramp.current(), 200.0);
        assert!(!ramp.is_gliding());

        // Holds after completion
        assert_eq!(ramp.next(), 200.0);
    }

    #[test]
    fn test_retarget_mid_glide() {
        let mut ramp = LinearRamp::new(0.0);
        ramp.set_target(10.0, 10);
        for _ in 0..5 {
            ramp.next();
        }
        let midway = ramp.current();
        assert!((midway - 5.0).abs() < 1e-3);

        ramp.set_target(0.0, 5);
        assert!((ramp.next() - 4.0).abs() < 1e-3);
        for _ in 0..4 {
            ramp.next();
        }
        assert_eq!(ramp.current(), 0.0);
    }

    #[test]
    fn test_zero_duration_jumps() {
        let mut ramp = LinearRamp::new(1.0);
        ramp.set_target(3.0, 0);
        assert_eq!(ramp.current(), 3.0);
        assert!(!ramp.is_gliding());
    }
}
