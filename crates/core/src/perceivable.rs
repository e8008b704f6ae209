//! Search for a foreground color that stays legible against a background.
//!
//! When the CIEDE2000 distance between foreground and background falls below
//! `min_threshold`, the foreground's Lab lightness is walked in fixed steps,
//! first towards white and then towards black, until a candidate reaches
//! `exp_threshold`. Only `L` moves; `a` and `b` are held fixed so the hue and
//! chroma of the candidate match the original foreground.
//!
//! `exp_threshold` is strictly greater than `min_threshold`, so an accepted
//! candidate lands clear of the boundary that triggered the search.
//!
//! If neither direction qualifies, the original foreground is returned
//! unchanged. The search never fails.

use crate::color::{lab_to_rgb, rgb_to_lab, Lab, Rgb};
use crate::delta_e::delta_e;
use crate::error::ColorError;
use crate::params::param_f64;
use serde::Serialize;
use serde_json::{json, Value};
use std::iter;

/// Below this distance an adjustment is attempted.
pub const DEFAULT_MIN_THRESHOLD: f64 = 12.0;
/// Distance a candidate must reach to be accepted.
pub const DEFAULT_EXP_THRESHOLD: f64 = 20.0;
/// Lightness increment per scan step.
pub const DEFAULT_LIGHTNESS_STEP: f64 = 5.0;
/// Smallest accepted lightness step. Bounds each scan to at most
/// `100 / MIN_LIGHTNESS_STEP` candidates.
pub const MIN_LIGHTNESS_STEP: f64 = 0.01;

/// Upper bound of the lightness scan.
const L_MAX: f64 = 100.0;
/// Lower bound of the lightness scan.
const L_MIN: f64 = 0.0;

/// Tuning constants for the lightness search.
///
/// Always valid once constructed: finite values,
/// `lightness_step >= MIN_LIGHTNESS_STEP` and
/// `exp_threshold > min_threshold >= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerceivableParams {
    min_threshold: f64,
    exp_threshold: f64,
    lightness_step: f64,
}

impl Default for PerceivableParams {
    fn default() -> Self {
        Self {
            min_threshold: DEFAULT_MIN_THRESHOLD,
            exp_threshold: DEFAULT_EXP_THRESHOLD,
            lightness_step: DEFAULT_LIGHTNESS_STEP,
        }
    }
}

impl PerceivableParams {
    /// Validates and builds a parameter set.
    ///
    /// Returns `ColorError::InvalidParams` for non-finite values, a negative
    /// `min_threshold`, an `exp_threshold` not above `min_threshold`, or a
    /// `lightness_step` below [`MIN_LIGHTNESS_STEP`].
    pub fn new(
        min_threshold: f64,
        exp_threshold: f64,
        lightness_step: f64,
    ) -> Result<Self, ColorError> {
        let values = [
            ("min_threshold", min_threshold),
            ("exp_threshold", exp_threshold),
            ("lightness_step", lightness_step),
        ];
        if let Some((name, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ColorError::InvalidParams(format!(
                "{name} must be finite, got {value}"
            )));
        }
        if min_threshold < 0.0 {
            return Err(ColorError::InvalidParams(format!(
                "min_threshold must be non-negative, got {min_threshold}"
            )));
        }
        if exp_threshold <= min_threshold {
            return Err(ColorError::InvalidParams(format!(
                "exp_threshold ({exp_threshold}) must be greater than min_threshold ({min_threshold})"
            )));
        }
        if lightness_step < MIN_LIGHTNESS_STEP {
            return Err(ColorError::InvalidParams(format!(
                "lightness_step must be at least {MIN_LIGHTNESS_STEP}, got {lightness_step}"
            )));
        }
        Ok(Self {
            min_threshold,
            exp_threshold,
            lightness_step,
        })
    }

    /// Extracts parameters from a JSON object, falling back to defaults for
    /// missing keys, then validates the result.
    pub fn from_json(params: &Value) -> Result<Self, ColorError> {
        Self::new(
            param_f64(params, "min_threshold", DEFAULT_MIN_THRESHOLD),
            param_f64(params, "exp_threshold", DEFAULT_EXP_THRESHOLD),
            param_f64(params, "lightness_step", DEFAULT_LIGHTNESS_STEP),
        )
    }

    /// Current values as a JSON object, keyed like [`from_json`](Self::from_json).
    pub fn to_json(&self) -> Value {
        json!({
            "min_threshold": self.min_threshold,
            "exp_threshold": self.exp_threshold,
            "lightness_step": self.lightness_step,
        })
    }

    pub fn min_threshold(&self) -> f64 {
        self.min_threshold
    }

    pub fn exp_threshold(&self) -> f64 {
        self.exp_threshold
    }

    pub fn lightness_step(&self) -> f64 {
        self.lightness_step
    }
}

/// Direction of the lightness scan that produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Lighter,
    Darker,
}

/// What the search did to the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Adjustment {
    /// The pair was already distinguishable.
    Unchanged,
    /// A lightness candidate reached `exp_threshold`.
    Adjusted {
        /// Accepted candidate, before quantization to `Rgb`.
        lab: Lab,
        direction: Direction,
        /// 1-based step count within `direction`.
        steps: usize,
        /// Distance from `lab` to the background.
        distance: f64,
    },
    /// Both directions ran out of lightness range.
    Exhausted,
}

/// Result of [`find_perceivable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Perceivable {
    /// Color to render with.
    pub color: Rgb,
    /// Distance between the original foreground and the background.
    pub initial_distance: f64,
    pub adjustment: Adjustment,
}

/// Returns a foreground that is perceivable against `bg`, using the default
/// thresholds.
///
/// The result equals `fg` when the pair is already far enough apart or when
/// no lightness qualifies. Callers must not assume the result always reaches
/// the expected distance.
pub fn make_perceivable(fg: Rgb, bg: Rgb) -> Rgb {
    make_perceivable_with(fg, bg, &PerceivableParams::default())
}

/// Like [`make_perceivable`] with explicit thresholds.
pub fn make_perceivable_with(fg: Rgb, bg: Rgb, params: &PerceivableParams) -> Rgb {
    find_perceivable(fg, bg, params).color
}

/// Runs the lightness search and reports how the result was reached.
pub fn find_perceivable(fg: Rgb, bg: Rgb, params: &PerceivableParams) -> Perceivable {
    let fg_lab = rgb_to_lab(fg);
    let bg_lab = rgb_to_lab(bg);
    let initial_distance = delta_e(fg_lab, bg_lab);

    if initial_distance >= params.min_threshold {
        tracing::debug!(
            fg = %fg.to_hex(),
            bg = %bg.to_hex(),
            distance = initial_distance,
            "foreground already perceivable"
        );
        return Perceivable {
            color: fg,
            initial_distance,
            adjustment: Adjustment::Unchanged,
        };
    }

    let found = [Direction::Lighter, Direction::Darker]
        .into_iter()
        .find_map(|direction| scan(fg_lab, bg_lab, direction, params));

    match found {
        Some((lab, direction, steps, distance)) => {
            let color = lab_to_rgb(lab);
            tracing::debug!(
                fg = %fg.to_hex(),
                bg = %bg.to_hex(),
                result = %color.to_hex(),
                ?direction,
                steps,
                initial_distance,
                distance,
                "adjusted foreground lightness"
            );
            Perceivable {
                color,
                initial_distance,
                adjustment: Adjustment::Adjusted {
                    lab,
                    direction,
                    steps,
                    distance,
                },
            }
        }
        None => {
            tracing::debug!(
                fg = %fg.to_hex(),
                bg = %bg.to_hex(),
                initial_distance,
                "no lightness reached the expected distance, keeping foreground"
            );
            Perceivable {
                color: fg,
                initial_distance,
                adjustment: Adjustment::Exhausted,
            }
        }
    }
}

/// Walks lightness from the original `fg.l` in one direction and returns the
/// first candidate whose distance to `bg` reaches `exp_threshold`.
fn scan(
    fg: Lab,
    bg: Lab,
    direction: Direction,
    params: &PerceivableParams,
) -> Option<(Lab, Direction, usize, f64)> {
    let step = match direction {
        Direction::Lighter => params.lightness_step,
        Direction::Darker => -params.lightness_step,
    };
    let in_range = |l: &f64| match direction {
        Direction::Lighter => *l <= L_MAX,
        Direction::Darker => *l >= L_MIN,
    };

    iter::successors(Some(fg.l + step), |l| Some(l + step))
        .take_while(in_range)
        .enumerate()
        .find_map(|(i, l)| {
            let candidate = fg.with_lightness(l);
            let distance = delta_e(candidate, bg);
            tracing::trace!(?direction, l, distance, "lightness candidate");
            (distance >= params.exp_threshold).then_some((candidate, direction, i + 1, distance))
        })
}
