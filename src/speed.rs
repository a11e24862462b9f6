//! Playback speed quantization.
//!
//! Two independent policies: shortcut-driven changes walk the fixed step
//! table via [`next_step`], continuous slider input rounds onto an
//! arithmetic grid via [`snap_to_grid`].

/// Allowed discrete playback speeds for keyboard-driven changes, ascending.
pub const SPEED_STEPS: [f64; 14] = [
    0.25, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.1, 1.2, 1.3, 1.4, 1.5, 1.75, 2.0,
];

/// Grid used for continuous slider-style speed input.
pub const SPEED_GRID_STEP: f64 = 0.05;

/// Slowest supported playback speed.
pub const SPEED_MIN: f64 = SPEED_STEPS[0];
/// Fastest supported playback speed.
pub const SPEED_MAX: f64 = SPEED_STEPS[SPEED_STEPS.len() - 1];

/// Next table entry strictly above (`increasing`) or below the current
/// speed. Idempotent at the table edges: already past the end returns the
/// boundary value unchanged.
pub fn next_step(current: f64, increasing: bool) -> f64 {
    if increasing {
        for &step in SPEED_STEPS.iter() {
            if step > current {
                return step;
            }
        }
        SPEED_MAX
    } else {
        for &step in SPEED_STEPS.iter().rev() {
            if step < current {
                return step;
            }
        }
        SPEED_MIN
    }
}

/// Round a value to the nearest multiple of `grid_step`.
///
/// Exact half-steps round away from zero (`f64::round`), so
/// `snap_to_grid(1.275, 0.05)` lands on the representable side of 1.275,
/// which is 1.25 in IEEE 754 doubles.
pub fn snap_to_grid(value: f64, grid_step: f64) -> f64 {
    (value / grid_step).round() * grid_step
}
