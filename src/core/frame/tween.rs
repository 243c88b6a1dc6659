//=========================================================================
// Tween Queue
//=========================================================================
//
// Timed scalar interpolations advanced once per frame.
//
// A tween starts on the first update after it is queued, writes its eased
// value through a setter every update, and writes the exact end value on
// the update that completes it. Completed tweens are dropped.
//
//=========================================================================

use log::trace;

//=== Easing ==============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,

    /// Fast start, gentle landing: `sin(t * π/2)`.
    SinusoidalOut,
}

impl Easing {
    /// Maps normalized progress `t` in `[0, 1]` onto the eased curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SinusoidalOut => (t * std::f32::consts::FRAC_PI_2).sin(),
        }
    }
}

//=== Tween ===============================================================

/// One scalar animation.
pub struct Tween {
    from: f32,
    to: f32,
    duration: f64,
    easing: Easing,
    started_at: Option<f64>,
    setter: Box<dyn FnMut(f32)>,
}

impl Tween {
    pub fn new<F>(from: f32, to: f32, duration: f64, setter: F) -> Self
    where
        F: FnMut(f32) + 'static,
    {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            easing: Easing::Linear,
            started_at: None,
            setter: Box::new(setter),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Advances to `elapsed` seconds. Returns `true` once finished.
    fn step(&mut self, elapsed: f64) -> bool {
        let start = *self.started_at.get_or_insert(elapsed);
        let progress = if self.duration <= f64::EPSILON {
            1.0
        } else {
            ((elapsed - start) / self.duration).clamp(0.0, 1.0)
        };

        let eased = self.easing.apply(progress as f32);
        (self.setter)(self.from + (self.to - self.from) * eased);
        progress >= 1.0
    }
}

//=== TweenQueue ==========================================================

#[derive(Default)]
pub struct TweenQueue {
    tweens: Vec<Tween>,
}

impl TweenQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tween: Tween) {
        self.tweens.push(tween);
    }

    /// Advances every tween to `elapsed` and drops the finished ones.
    pub fn update(&mut self, elapsed: f64) {
        let before = self.tweens.len();
        self.tweens.retain_mut(|tween| !tween.step(elapsed));

        let finished = before - self.tweens.len();
        if finished > 0 {
            trace!(target: "stage::frame", "{} tween(s) finished", finished);
        }
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
