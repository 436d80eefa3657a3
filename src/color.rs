use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Sequential colour scale (light yellow → dark blue)
// ---------------------------------------------------------------------------

/// ColorBrewer "YlGnBu" 9-class anchors, lightest first.
const YL_GN_BU: [(u8, u8, u8); 9] = [
    (0xff, 0xff, 0xd9),
    (0xed, 0xf8, 0xb1),
    (0xc7, 0xe9, 0xb4),
    (0x7f, 0xcd, 0xbb),
    (0x41, 0xb6, 0xc4),
    (0x1d, 0x91, 0xc0),
    (0x22, 0x5e, 0xa8),
    (0x25, 0x34, 0x94),
    (0x08, 0x1d, 0x58),
];

/// ColorBrewer's discrete "YlGnBu" schemes for 3 to 9 classes.
const YL_GN_BU_SCHEMES: [&[u32]; 7] = [
    &[0xedf8b1, 0x7fcdbb, 0x2c7fb8],
    &[0xffffcc, 0xa1dab4, 0x41b6c4, 0x225ea8],
    &[0xffffcc, 0xa1dab4, 0x41b6c4, 0x2c7fb8, 0x253494],
    &[0xffffcc, 0xc7e9b4, 0x7fcdbb, 0x41b6c4, 0x2c7fb8, 0x253494],
    &[0xffffcc, 0xc7e9b4, 0x7fcdbb, 0x41b6c4, 0x1d91c0, 0x225ea8, 0x0c2c84],
    &[0xffffd9, 0xedf8b1, 0xc7e9b4, 0x7fcdbb, 0x41b6c4, 0x1d91c0, 0x225ea8, 0x0c2c84],
    &[0xffffd9, 0xedf8b1, 0xc7e9b4, 0x7fcdbb, 0x41b6c4, 0x1d91c0, 0x225ea8, 0x253494, 0x081d58],
];

/// Sequential colour ramp: ColorBrewer's discrete classes where a scheme
/// exists, otherwise interpolated (in linear RGB) between the anchors.
#[derive(Debug, Clone)]
pub struct SequentialScale {
    anchors: Vec<LinSrgb>,
    schemes: &'static [&'static [u32]],
}

impl SequentialScale {
    pub fn yl_gn_bu() -> Self {
        let anchors = YL_GN_BU
            .iter()
            .map(|&(r, g, b)| Srgb::new(r, g, b).into_format::<f32>().into_linear())
            .collect();
        Self {
            anchors,
            schemes: &YL_GN_BU_SCHEMES,
        }
    }

    /// Colour at position `t` in `[0, 1]` (clamped).
    pub fn sample(&self, t: f64) -> Color32 {
        let last = self.anchors.len() - 1;
        let pos = t.clamp(0.0, 1.0) as f32 * last as f32;
        let lo = (pos.floor() as usize).min(last);
        let hi = (lo + 1).min(last);
        let mixed = self.anchors[lo].mix(self.anchors[hi], pos - lo as f32);
        to_color32(Srgb::from_linear(mixed))
    }

    /// `n` colours from lightest to darkest.
    pub fn classes(&self, n: usize) -> Vec<Color32> {
        if let Some(scheme) = self.schemes.iter().find(|s| s.len() == n) {
            return scheme
                .iter()
                .map(|&packed| {
                    let rgb = Srgb::<u8>::from(packed);
                    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
                })
                .collect();
        }
        match n {
            0 => Vec::new(),
            1 => vec![self.sample(0.0)],
            _ => (0..n)
                .map(|i| self.sample(i as f64 / (n - 1) as f64))
                .collect(),
        }
    }
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// `#rrggbb` form, used for exported features.
pub fn hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luminance(c: Color32) -> f32 {
        0.2126 * c.r() as f32 + 0.7152 * c.g() as f32 + 0.0722 * c.b() as f32
    }

    #[test]
    fn endpoints_match_anchors() {
        let scale = SequentialScale::yl_gn_bu();
        assert_eq!(hex(scale.sample(0.0)), "#ffffd9");
        assert_eq!(hex(scale.sample(1.0)), "#081d58");
        assert_eq!(scale.sample(-3.0), scale.sample(0.0));
        assert_eq!(scale.sample(7.0), scale.sample(1.0));
    }

    #[test]
    fn six_classes_use_the_colorbrewer_scheme() {
        let classes: Vec<String> = SequentialScale::yl_gn_bu()
            .classes(6)
            .into_iter()
            .map(hex)
            .collect();
        assert_eq!(
            classes,
            vec!["#ffffcc", "#c7e9b4", "#7fcdbb", "#41b6c4", "#2c7fb8", "#253494"]
        );
    }

    #[test]
    fn classes_get_darker() {
        let scale = SequentialScale::yl_gn_bu();
        for n in [2, 3, 6, 9] {
            let classes = scale.classes(n);
            assert_eq!(classes.len(), n);
            for pair in classes.windows(2) {
                assert!(luminance(pair[0]) > luminance(pair[1]), "{n} classes");
            }
        }
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(hex(Color32::from_rgb(1, 0xab, 0xff)), "#01abff");
    }
}
