//! CIEDE2000 perceptual color difference.
//!
//! Implements the formula from CIE 142-2001 in the form given by Sharma, Wu
//! and Dalal, "The CIEDE2000 Color-Difference Formula: Implementation Notes,
//! Supplementary Test Data, and Mathematical Observations" (2005).
//!
//! Degenerate hues are handled explicitly: a color with `a' = b = 0` has hue
//! 0, and the hue difference is 0 whenever either chroma is 0. The result is
//! therefore finite and non-negative for every finite pair of inputs.

use crate::color::{hue_angle, Lab};
use std::f64::consts::{PI, TAU};

const RAD_006: f64 = PI / 30.0;
const RAD_025: f64 = 5.0 * PI / 36.0;
const RAD_030: f64 = PI / 6.0;
const RAD_060: f64 = PI / 3.0;
const RAD_063: f64 = 7.0 * PI / 20.0;
const RAD_180: f64 = PI;
const RAD_275: f64 = 55.0 * PI / 36.0;
const RAD_360: f64 = TAU;

/// 25^7, the chroma pivot of the a' correction and of R_T.
const POW25_7: f64 = 6_103_515_625.0;

/// Parametric weighting factors k_L, k_C, k_H.
///
/// The reference conditions of CIEDE2000 use unit weights, which is what
/// [`delta_e`] applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub lightness: f64,
    pub chroma: f64,
    pub hue: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            lightness: 1.0,
            chroma: 1.0,
            hue: 1.0,
        }
    }
}

/// CIEDE2000 color difference with unit weighting factors.
pub fn delta_e(x1: Lab, x2: Lab) -> f64 {
    delta_e_weighted(x1, x2, Weights::default())
}

/// CIEDE2000 color difference with explicit parametric weighting factors.
pub fn delta_e_weighted(x1: Lab, x2: Lab, k: Weights) -> f64 {
    let c1 = x1.a.hypot(x1.b);
    let c2 = x2.a.hypot(x2.b);
    let c_bar = (c1 + c2) / 2.0;

    // Shared a' correction against the blue-region over-sensitivity.
    let g = 0.5 * (1.0 - chroma_ratio(c_bar));
    let a_prime1 = x1.a * (1.0 + g);
    let a_prime2 = x2.a * (1.0 + g);

    let c_prime1 = a_prime1.hypot(x1.b);
    let c_prime2 = a_prime2.hypot(x2.b);

    let h_prime1 = hue_angle(x1.b, a_prime1);
    let h_prime2 = hue_angle(x2.b, a_prime2);

    let delta_l_prime = x2.l - x1.l;
    let delta_c_prime = c_prime2 - c_prime1;

    let chroma_product = c_prime1 * c_prime2;
    let delta_h_prime = if chroma_product == 0.0 {
        0.0
    } else {
        let dh = h_prime2 - h_prime1;
        let dh = if dh.abs() <= RAD_180 {
            dh
        } else if h_prime2 <= h_prime1 {
            dh + RAD_360
        } else {
            dh - RAD_360
        };
        2.0 * chroma_product.sqrt() * (dh / 2.0).sin()
    };

    let l_bar = (x1.l + x2.l) / 2.0;
    let c_bar_prime = (c_prime1 + c_prime2) / 2.0;
    let h_bar_prime = mean_hue(h_prime1, h_prime2);

    let t = 1.0 - 0.17 * (h_bar_prime - RAD_030).cos()
        + 0.24 * (2.0 * h_bar_prime).cos()
        + 0.32 * (3.0 * h_bar_prime + RAD_006).cos()
        - 0.20 * (4.0 * h_bar_prime - RAD_063).cos();

    let l_offset = (l_bar - 50.0).powi(2);
    let s_l = 1.0 + (0.015 * l_offset) / (20.0 + l_offset).sqrt();
    let s_c = 1.0 + 0.045 * c_bar_prime;
    let s_h = 1.0 + 0.015 * c_bar_prime * t;

    let rotation = (-((h_bar_prime - RAD_275) / RAD_025).powi(2)).exp();
    let r_t = -2.0 * chroma_ratio(c_bar_prime) * (RAD_060 * rotation).sin();

    let lightness = delta_l_prime / (k.lightness * s_l);
    let chroma = delta_c_prime / (k.chroma * s_c);
    let hue = delta_h_prime / (k.hue * s_h);

    (lightness.powi(2) + chroma.powi(2) + hue.powi(2) + r_t * chroma * hue).sqrt()
}

/// `sqrt(C^7 / (C^7 + 25^7))`, shared by the a' correction and R_T.
fn chroma_ratio(c: f64) -> f64 {
    let c7 = c.powi(7);
    (c7 / (c7 + POW25_7)).sqrt()
}

/// Mean of two hue angles taken the short way around the circle.
fn mean_hue(h1: f64, h2: f64) -> f64 {
    let sum = h1 + h2;
    if (h1 - h2).abs() <= RAD_180 {
        sum / 2.0
    } else if sum < RAD_360 {
        (sum + RAD_360) / 2.0
    } else {
        (sum - RAD_360) / 2.0
    }
}
