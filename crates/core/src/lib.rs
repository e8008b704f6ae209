#![deny(unsafe_code)]
//! Perceptual color difference and legible-foreground search.
//!
//! Provides sRGB <-> CIE Lab conversion (`Rgb`, `Xyz`, `Lab`), the CIEDE2000
//! color difference (`delta_e`), and `make_perceivable`, which nudges a
//! foreground's lightness until it is distinguishable from a background.
//!
//! Everything here is a pure function over `Copy` values: no shared state,
//! no I/O, safe to call from any thread.

pub mod color;
pub mod delta_e;
pub mod error;
pub mod params;
pub mod perceivable;

pub use color::{lab_to_rgb, rgb_to_lab, Lab, Rgb, Xyz};
pub use delta_e::{delta_e, delta_e_weighted, Weights};
pub use error::ColorError;
pub use perceivable::{
    find_perceivable, make_perceivable, make_perceivable_with, Adjustment, Direction,
    Perceivable, PerceivableParams,
};
