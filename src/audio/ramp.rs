//! Scheduled parameter ramps evaluated on the audio clock.

/// Smallest value an exponential ramp may start from or aim for
const EXPONENTIAL_FLOOR: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampShape {
    Linear,
    /// Constant ratio per unit time (equal steps in pitch for frequencies)
    Exponential,
}

#[derive(Debug, Clone, Copy)]
struct Ramp {
    shape: RampShape,
    from: f32,
    to: f32,
    start_s: f64,
    end_s: f64,
}

impl Ramp {
    fn value_at(&self, time_s: f64) -> f32 {
        if time_s >= self.end_s {
            return self.to;
        }
        if time_s <= self.start_s {
            return self.from;
        }
        let progress = ((time_s - self.start_s) / (self.end_s - self.start_s)) as f32;
        match self.shape {
            RampShape::Linear => self.from + (self.to - self.from) * progress,
            RampShape::Exponential => self.from * (self.to / self.from).powf(progress),
        }
    }
}

/// A parameter that glides toward its latest target
///
/// Retargeting mid-ramp starts the new ramp from the value the old one had
/// reached, so successive ramps join without jumps.
#[derive(Debug, Clone)]
pub struct AutomatedParam {
    value: f32,
    ramp: Option<Ramp>,
}

impl AutomatedParam {
    pub fn new(value: f32) -> Self {
        Self { value, ramp: None }
    }

    /// Value at `time_s` without consuming the ramp
    pub fn value_at(&self, time_s: f64) -> f32 {
        self.ramp.map_or(self.value, |ramp| ramp.value_at(time_s))
    }

    /// Last value produced by [`advance`](Self::advance)
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Final value of the active ramp (or the current value)
    pub fn target(&self) -> f32 {
        self.ramp.map_or(self.value, |ramp| ramp.to)
    }

    /// Step to `time_s`, dropping the ramp once it has finished
    pub fn advance(&mut self, time_s: f64) -> f32 {
        if let Some(ramp) = self.ramp {
            self.value = ramp.value_at(time_s);
            if time_s >= ramp.end_s {
                self.ramp = None;
            }
        }
        self.value
    }

    /// Jump immediately (no ramp)
    pub fn set_value(&mut self, value: f32) {
        self.value = value;
        self.ramp = None;
    }

    pub fn linear_ramp_to(&mut self, target: f32, now_s: f64, duration_s: f32) {
        self.schedule(RampShape::Linear, target, now_s, duration_s);
    }

    /// Exponential glide; both ends are floored to stay strictly positive
    pub fn exponential_ramp_to(&mut self, target: f32, now_s: f64, duration_s: f32) {
        self.schedule(RampShape::Exponential, target, now_s, duration_s);
    }

    fn schedule(&mut self, shape: RampShape, target: f32, now_s: f64, duration_s: f32) {
        let current = self.value_at(now_s);
        if duration_s <= 0.0 {
            self.set_value(target);
            return;
        }
        let (from, to) = match shape {
            RampShape::Linear => (current, target),
            RampShape::Exponential => (
                current.max(EXPONENTIAL_FLOOR),
                target.max(EXPONENTIAL_FLOOR),
            ),
        };
        self.value = from;
        self.ramp = Some(Ramp {
            shape,
            from,
            to,
            start_s: now_s,
            end_s: now_s + duration_s as f64,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_ramp() {
        let mut param = AutomatedParam::new(0.0);
        param.linear_ramp_to(1.0, 10.0, 0.5);

        assert_eq!(param.value_at(10.0), 0.0);
        assert!((param.value_at(10.25) - 0.5).abs() < 1e-6);
        assert_eq!(param.value_at(10.5), 1.0);
        assert_eq!(param.target(), 1.0);
    }

    #[test]
    fn test_exponential_ramp_is_geometric() {
        let mut param = AutomatedParam::new(100.0);
        param.exponential_ramp_to(400.0, 0.0, 1.0);

        // Halfway in time is the geometric mean, not the arithmetic one
        assert!((param.value_at(0.5) - 200.0).abs() < 1e-2);
        assert_eq!(param.value_at(2.0), 400.0);
    }

    #[test]
    fn test_retarget_continues_from_reached_value() {
        let mut param = AutomatedParam::new(0.0);
        param.linear_ramp_to(1.0, 0.0, 1.0);
        param.linear_ramp_to(0.0, 0.5, 1.0);

        assert!((param.value_at(0.5) - 0.5).abs() < 1e-6);
        assert!((param.value_at(1.0) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_advance_finishes_ramp() {
        let mut param = AutomatedParam::new(2.0);
        param.linear_ramp_to(4.0, 0.0, 0.1);

        assert!((param.advance(0.05) - 3.0).abs() < 1e-6);
        assert_eq!(param.advance(0.2), 4.0);
        assert_eq!(param.value(), 4.0);
        assert_eq!(param.value_at(5.0), 4.0);
    }

    #[test]
    fn test_exponential_from_zero_is_floored() {
        let mut param = AutomatedParam::new(0.0);
        param.exponential_ramp_to(1.0, 0.0, 1.0);
        assert!(param.value_at(0.5).is_finite());
        assert!(param.value_at(0.5) > 0.0);
    }

    #[test]
    fn test_zero_duration_jumps() {
        let mut param = AutomatedParam::new(1.0);
        param.linear_ramp_to(3.0, 0.0, 0.0);
        assert_eq!(param.value(), 3.0);
        assert_eq!(param.value_at(0.0), 3.0);
    }
}
