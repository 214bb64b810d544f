use bevy_ecs::prelude::Component;

/// Inclusive range of floats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatRange {
    pub minimum: f32,
    pub maximum: f32,
}

impl FloatRange {
    pub const fn new(minimum: f32, maximum: f32) -> Self {
        Self { minimum, maximum }
    }

    /// Position of `value` within the range, clamped to `0..=1`.
    /// An empty range maps everything to `0`.
    pub fn inverse_lerp(&self, value: f32) -> f32 {
        if self.minimum == self.maximum {
            return 0.0;
        }
        ((value - self.minimum) / (self.maximum - self.minimum)).clamp(0.0, 1.0)
    }

    pub fn lerp(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        self.minimum + (self.maximum - self.minimum) * t
    }

    pub fn smooth_step(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let t = -2.0 * t * t * t + 3.0 * t * t;
        self.maximum * t + self.minimum * (1.0 - t)
    }
}

impl Default for FloatRange {
    fn default() -> Self {
        FloatRange::new(0.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Lerp,
    SmoothStep,
}

impl OutputMode {
    /// Mode by declaration index; out of range indices pick the last mode.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => OutputMode::Lerp,
            _ => OutputMode::SmoothStep,
        }
    }
}

/// Remaps a value from one range into another.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct FloatRangeValueRemapper {
    pub from: FloatRange,
    pub to: FloatRange,
    pub mode: OutputMode,
}

impl FloatRangeValueRemapper {
    pub fn new(from: FloatRange, to: FloatRange) -> Self {
        Self {
            from,
            to,
            mode: OutputMode::Lerp,
        }
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn set_mode(&mut self, index: usize) {
        self.mode = OutputMode::from_index(index);
    }

    pub fn remap(&self, input: f32) -> f32 {
        let t = self.from.inverse_lerp(input);
        match self.mode {
            OutputMode::Lerp => self.to.lerp(t),
            OutputMode::SmoothStep => self.to.smooth_step(t),
        }
    }
}
