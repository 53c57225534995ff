// THEORY:
// The `colour_limits` module turns a single target colour into the HSV band the
// upstream detector thresholds against. The detector converts each frame to
// HSV and keeps only pixels inside `[lower, upper]`; the contours of that mask
// are what the cluster engine eventually receives as boxes.
//
// Key architectural principles:
// 1.  **OpenCV Layout**: Values use OpenCV's 8-bit HSV layout, with hue halved
//     to fit 0..180 and saturation/value in 0..=255, so the limits can be handed
//     straight to `in_range`. Only the hue of the target colour feeds the
//     limits; saturation is computed for completeness and is not bit-exact with
//     OpenCV's `cvtColor`.
// 2.  **Hue Band, Loose Saturation/Value**: Only hue is matched tightly (±10).
//     Saturation and value just need to be "clearly coloured" (>= 100), which
//     keeps the mask stable under changing light.
// 3.  **Red Wraps Around**: Red sits at both ends of the hue circle. Near either
//     end the band is pinned to that end of the range instead of wrapping.

/// Half-width of the hue band, in OpenCV hue units (2 degrees each).
const HUE_TOLERANCE: u8 = 10;
/// Hues at or below this are treated as "red near zero".
const LOW_RED_HUE: u8 = 15;
/// Hues at or above this are treated as "red near 180".
const HIGH_RED_HUE: u8 = 165;
/// Upper end of OpenCV's 8-bit hue range.
const HUE_RANGE: u8 = 180;
const MIN_SATURATION: u8 = 100;
const MIN_VALUE: u8 = 100;

/// An `(h, s, v)` triple in OpenCV's 8-bit HSV layout.
pub type Hsv = [u8; 3];

/// Inclusive HSV bounds for a colour mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvLimits {
    pub lower: Hsv,
    pub upper: Hsv,
}

/// Converts a `[b, g, r]` pixel to OpenCV's 8-bit HSV layout.
pub fn bgr_to_hsv(bgr: [u8; 3]) -> Hsv {
    let [b, g, r] = bgr.map(i32::from);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = max - min;

    // Rounded division. OpenCV uses a fixed-point reciprocal table here, so
    // this can differ from `cvtColor` by 1 for some inputs.
    let saturation = if max == 0 { 0 } else { (chroma * 255 + max / 2) / max };

    let hue = if chroma == 0 {
        0
    } else {
        // Degrees / 2, i.e. 30 hue units per 60-degree sector.
        let (difference, sector_offset) = if max == r {
            (g - b, 0.0)
        } else if max == g {
            (b - r, 60.0)
        } else {
            (r - g, 120.0)
        };
        let units = 30.0 * difference as f64 / chroma as f64 + sector_offset;
        let rounded = (units + 0.5).floor() as i32;
        if rounded < 0 { rounded + i32::from(HUE_RANGE) } else { rounded }
    };

    [hue as u8, saturation as u8, max as u8]
}

/// HSV mask limits for a target colour given as `[b, g, r]`.
pub fn hsv_limits(bgr: [u8; 3]) -> HsvLimits {
    let hue = bgr_to_hsv(bgr)[0];

    let (lower_hue, upper_hue) = if hue >= HIGH_RED_HUE {
        (hue, HUE_RANGE)
    } else if hue <= LOW_RED_HUE {
        (0, hue + HUE_TOLERANCE)
    } else {
        (hue - HUE_TOLERANCE, hue + HUE_TOLERANCE)
    };

    HsvLimits {
        lower: [lower_hue, MIN_SATURATION, MIN_VALUE],
        upper: [upper_hue, u8::MAX, u8::MAX],
    }
}
