//! CIEDE2000 color difference.
//!
//! Follows CIE Technical Report 142-2001 with the parametric weights
//! k_L = k_C = k_H = 1. Every angle is carried in degrees and converted to
//! radians only at the trigonometric call sites.

#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]

use crate::constants::SIMILARITY_SLOPE;
use crate::models::LabColor;

/// 25^7, the pivot of the chroma compensation terms.
const POW25_7: f64 = 6_103_515_625.0;

/// CIEDE2000 distance between two Lab colors.
///
/// The result is never negative and is exactly zero for identical inputs.
///
/// # Examples
///
/// ```
/// use chromamatch::color::ciede2000;
/// use chromamatch::models::LabColor;
///
/// let a = LabColor::new(50.0, 2.6772, -79.7751);
/// let b = LabColor::new(50.0, 0.0, -82.7485);
/// assert!((ciede2000(a, b) - 2.0425).abs() < 1e-4);
/// ```
#[must_use]
pub fn ciede2000(lab1: LabColor, lab2: LabColor) -> f64 {
    // 1. chroma and its mean
    let c1 = lab1.a.hypot(lab1.b);
    let c2 = lab2.a.hypot(lab2.b);
    let c_mean = (c1 + c2) / 2.0;

    // 2. G correction applied to a*
    let c_mean7 = c_mean.powi(7);
    let g = 0.5 * (1.0 - (c_mean7 / (c_mean7 + POW25_7)).sqrt());
    let a1p = lab1.a * (1.0 + g);
    let a2p = lab2.a * (1.0 + g);

    // 3. adjusted chroma and hue
    let c1p = a1p.hypot(lab1.b);
    let c2p = a2p.hypot(lab2.b);
    let h1p = hue_degrees(a1p, lab1.b);
    let h2p = hue_degrees(a2p, lab2.b);

    let chroma_product = c1p * c2p;

    let dl = lab2.l - lab1.l;
    let dc = c2p - c1p;
    let dh = if chroma_product == 0.0 {
        0.0
    } else {
        let diff = h2p - h1p;
        if diff > 180.0 {
            diff - 360.0
        } else if diff < -180.0 {
            diff + 360.0
        } else {
            diff
        }
    };
    let dh_big = 2.0 * chroma_product.sqrt() * (dh / 2.0).to_radians().sin();

    // 4. weighting functions
    let l_mean = (lab1.l + lab2.l) / 2.0;
    let cp_mean = (c1p + c2p) / 2.0;
    let hp_mean = mean_hue(h1p, h2p, chroma_product);

    let t = 1.0 - 0.17 * (hp_mean - 30.0).to_radians().cos()
        + 0.24 * (2.0 * hp_mean).to_radians().cos()
        + 0.32 * (3.0 * hp_mean + 6.0).to_radians().cos()
        - 0.20 * (4.0 * hp_mean - 63.0).to_radians().cos();

    let l_offset = (l_mean - 50.0).powi(2);
    let s_l = 1.0 + 0.015 * l_offset / (20.0 + l_offset).sqrt();
    let s_c = 1.0 + 0.045 * cp_mean;
    let s_h = 1.0 + 0.015 * cp_mean * t;

    // 5. rotation term for the blue region
    let d_theta = 30.0 * (-((hp_mean - 275.0) / 25.0).powi(2)).exp();
    let cp_mean7 = cp_mean.powi(7);
    let r_c = 2.0 * (cp_mean7 / (cp_mean7 + POW25_7)).sqrt();
    let r_t = -r_c * (2.0 * d_theta).to_radians().sin();

    // 6. combine
    let l_term = dl / s_l;
    let c_term = dc / s_c;
    let h_term = dh_big / s_h;

    (l_term * l_term + c_term * c_term + h_term * h_term + r_t * c_term * h_term)
        .max(0.0)
        .sqrt()
}

/// Maps a Delta E value onto the 0-100 display similarity score.
///
/// `max(0, 100 - 5 * delta_e)`; a fixed display heuristic, not a probability.
#[must_use]
pub fn similarity(delta_e: f64) -> f64 {
    (100.0 - SIMILARITY_SLOPE * delta_e).max(0.0)
}

/// Hue angle of (a', b) in degrees within [0, 360); zero chroma maps to 0.
fn hue_degrees(a: f64, b: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a).to_degrees();
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

/// Mean hue, taking the short way around the circle.
fn mean_hue(h1: f64, h2: f64, chroma_product: f64) -> f64 {
    if chroma_product == 0.0 {
        return h1 + h2;
    }
    let sum = h1 + h2;
    if (h1 - h2).abs() <= 180.0 {
        sum / 2.0
    } else if sum < 360.0 {
        (sum + 360.0) / 2.0
    } else {
        (sum - 360.0) / 2.0
    }
}
