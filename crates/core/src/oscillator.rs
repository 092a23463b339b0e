//! Synthetic AC oscillator driving the pipeline.
//!
//! The scheduler only cares about the sign of the signal: strictly positive
//! half-cycles advance the token, everything else resets the pipeline.

use std::f64::consts::TAU;

/// Phases closer than this to a half-cycle boundary evaluate to exactly zero.
pub const ZERO_CROSSING_TOLERANCE: f64 = 1e-9;

/// Evaluate `sin(2π · freq · t)`.
///
/// The phase `freq · t` is reduced to `[0, 1)` first. Phases at a
/// half-cycle boundary (0, ½, 1) return `0.0` exactly instead of the
/// `±1e-16` residue `sin` produces there, so whether a tick lands on a
/// zero-crossing does not depend on rounding.
///
/// # Example
///
/// ```
/// use ep_core::oscillator::signal;
///
/// assert_eq!(signal(0.0, 60.0), 0.0);
/// assert_eq!(signal(0.25, 1.0), 1.0);
/// assert_eq!(signal(0.5, 1.0), 0.0);
/// ```
pub fn signal(t: f64, freq: f64) -> f64 {
    let phase = (freq * t).rem_euclid(1.0);
    if is_zero_crossing(phase) {
        return 0.0;
    }
    (TAU * phase).sin()
}

fn is_zero_crossing(phase: f64) -> bool {
    [0.0, 0.5, 1.0]
        .iter()
        .any(|boundary| (phase - boundary).abs() < ZERO_CROSSING_TOLERANCE)
}
