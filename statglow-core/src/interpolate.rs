//! Time-based interpolation
//!
//! Displayed values never jump to a new reading. Each one glides linearly
//! from where it was when the reading arrived to the new target over a
//! fixed span, driven by the wall clock rather than the frame rate:
//!
//! ```text
//!  value
//!    ▲            target ●────────────
//!    │              ╱
//!    │            ╱
//!    │  previous ●
//!    └───────────┼────────┼──────────► time
//!           updated_at   +span
//! ```

/// Linear interpolation between `previous` and `target`
///
/// Progress is `elapsed_ms / span_ms` clamped to `[0, 1]`. A finished glide
/// (or a zero span) returns `target` exactly.
pub fn interpolate(previous: f32, target: f32, elapsed_ms: u64, span_ms: u32) -> f32 {
    if span_ms == 0 || elapsed_ms >= u64::from(span_ms) {
        return target;
    }

    let glide = elapsed_ms as f32 / span_ms as f32;
    let value = previous + (target - previous) * glide;

    // Keep rounding from stepping outside the segment
    value.clamp(previous.min(target), previous.max(target))
}

/// One animated value with its glide state
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Glide {
    current: f32,
    target: f32,
    previous: f32,
    updated_at_ms: u64,
    span_ms: u32,
    min: f32,
    max: f32,
}

impl Glide {
    /// Create a glide resting at `initial`, clamped to `[min, max]`
    pub fn new(initial: f32, span_ms: u32, min: f32, max: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            previous: initial,
            updated_at_ms: 0,
            span_ms,
            min,
            max,
        }
    }

    /// Override the displayed value without touching the target
    ///
    /// Used to start a widget out of its settled state so the first
    /// iteration draws it.
    pub fn with_current(mut self, current: f32) -> Self {
        self.current = current;
        self
    }

    /// Start a new glide from the current value toward `target`
    pub fn retarget(&mut self, target: f32, now_ms: u64) {
        self.previous = self.current;
        self.target = self.clamp(target);
        self.updated_at_ms = now_ms;
    }

    /// Recompute the current value unconditionally
    pub fn recompute(&mut self, now_ms: u64) {
        let elapsed = now_ms.saturating_sub(self.updated_at_ms);
        let value = interpolate(self.previous, self.target, elapsed, self.span_ms);
        self.current = self.clamp(value);
    }

    /// Step toward the target
    ///
    /// Returns `false` without doing anything when already settled.
    pub fn advance(&mut self, now_ms: u64) -> bool {
        if self.is_settled() {
            return false;
        }
        self.recompute(now_ms);
        true
    }

    /// True when the integer parts of current and target agree
    pub fn is_settled(&self) -> bool {
        truncate(self.current) == truncate(self.target)
    }

    /// Value to display
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Value being approached
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Value the glide started from
    pub fn previous(&self) -> f32 {
        self.previous
    }

    /// Glide duration in milliseconds
    pub fn span_ms(&self) -> u32 {
        self.span_ms
    }

    fn clamp(&self, value: f32) -> f32 {
        // NaN from the wire lands on the lower bound
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }
}

/// Integer part of a displayed value (toward zero, saturating)
pub fn truncate(value: f32) -> i64 {
    value as i64
}
