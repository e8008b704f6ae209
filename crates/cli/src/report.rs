//! Human-readable and JSON renderings of core results.

use colorfix_core::{
    delta_e, rgb_to_lab, Adjustment, Direction, Perceivable, PerceivableParams, Rgb,
};
use serde_json::{json, Value};

pub fn lab_json(color: Rgb) -> Value {
    let lab = rgb_to_lab(color);
    json!({
        "color": color,
        "lab": lab,
        "chroma": lab.chroma(),
        "hue": lab.hue_degrees(),
    })
}

pub fn lab_text(color: Rgb) -> String {
    let lab = rgb_to_lab(color);
    format!(
        "{}  L={:.4} a={:.4} b={:.4}  C={:.4} h={:.2}",
        color.to_hex(),
        lab.l,
        lab.a,
        lab.b,
        lab.chroma(),
        lab.hue_degrees()
    )
}

pub fn delta_e_json(c1: Rgb, c2: Rgb) -> Value {
    json!({
        "color1": c1,
        "color2": c2,
        "delta_e": delta_e(rgb_to_lab(c1), rgb_to_lab(c2)),
    })
}

pub fn delta_e_text(c1: Rgb, c2: Rgb) -> String {
    format!("{:.4}", delta_e(rgb_to_lab(c1), rgb_to_lab(c2)))
}

pub fn fix_json(fg: Rgb, bg: Rgb, result: &Perceivable, params: &PerceivableParams) -> Value {
    json!({
        "foreground": fg,
        "background": bg,
        "params": params.to_json(),
        "result": result,
    })
}

/// First line is the color to use; the second describes how it was reached.
pub fn fix_text(result: &Perceivable) -> String {
    let detail = match result.adjustment {
        Adjustment::Unchanged => format!(
            "unchanged (ΔE00 {:.2} already distinguishable)",
            result.initial_distance
        ),
        Adjustment::Adjusted {
            lab,
            direction,
            steps,
            distance,
        } => {
            let towards = match direction {
                Direction::Lighter => "lighter",
                Direction::Darker => "darker",
            };
            format!(
                "adjusted {steps} step(s) {towards} to L={:.2} (ΔE00 {:.2} -> {:.2})",
                lab.l, result.initial_distance, distance
            )
        }
        Adjustment::Exhausted => format!(
            "unchanged (ΔE00 {:.2}, no lightness reached the expected distance)",
            result.initial_distance
        ),
    };
    format!("{}\n{detail}", result.color.to_hex())
}
