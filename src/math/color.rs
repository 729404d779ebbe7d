use egui::Color32;

pub const LINEAR_LOW: Color32 = Color32::from_rgb(100, 200, 255);
pub const LINEAR_HIGH: Color32 = Color32::from_rgb(255, 100, 100);

const HSV_HUE_SPAN: f32 = 0.66;
const HSV_SATURATION: f32 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gradient {
    Linear,
    Hsv,
}

/// Maps heights to colors relative to the loaded height range.
#[derive(Clone, Copy, Debug)]
pub struct ColorMapper {
    pub gradient: Gradient,
    pub min_z: f32,
    pub max_z: f32,
}

impl ColorMapper {
    pub fn new(gradient: Gradient, min_z: f32, max_z: f32) -> Self {
        Self {
            gradient,
            min_z,
            max_z,
        }
    }

    /// Color for a height. A valid hex override wins; anything else falls
    /// back to the gradient without complaint.
    pub fn color_for(&self, z: f32, custom: Option<&str>) -> Color32 {
        if let Some(color) = custom.and_then(parse_hex_color) {
            return color;
        }
        self.gradient_color(z)
    }

    pub fn gradient_color(&self, z: f32) -> Color32 {
        let ratio = self.ratio(z);
        match self.gradient {
            Gradient::Linear => lerp_color(LINEAR_LOW, LINEAR_HIGH, ratio),
            Gradient::Hsv => {
                let hue = HSV_HUE_SPAN * (1.0 - ratio);
                let value = 0.8 + 0.2 * ratio;
                hsv_to_rgb(hue, HSV_SATURATION, value)
            }
        }
    }

    pub fn ratio(&self, z: f32) -> f32 {
        if self.max_z == self.min_z {
            return 0.5;
        }
        ((z - self.min_z) / (self.max_z - self.min_z)).clamp(0.0, 1.0)
    }
}

/// Parses `rrggbb` or `0xrrggbb`.
pub fn parse_hex_color(token: &str) -> Option<Color32> {
    let hex = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);

    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color32::from_rgb(r, g, b))
}

fn lerp_color(low: Color32, high: Color32, ratio: f32) -> Color32 {
    let channel = |lo: u8, hi: u8| -> u8 {
        let v = lo as f32 * (1.0 - ratio) + hi as f32 * ratio;
        (v as i32).clamp(0, 255) as u8
    };
    Color32::from_rgb(
        channel(low.r(), high.r()),
        channel(low.g(), high.g()),
        channel(low.b(), high.b()),
    )
}

fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Color32 {
    let h = hue * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - f * saturation);
    let t = value * (1.0 - (1.0 - f) * saturation);

    let (r, g, b) = match sector as i32 {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    };

    let to_byte = |c: f32| ((c * 255.0) as i32).clamp(0, 255) as u8;
    Color32::from_rgb(to_byte(r), to_byte(g), to_byte(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_with_prefix_is_pure_green_everywhere() {
        for gradient in [Gradient::Linear, Gradient::Hsv] {
            let mapper = ColorMapper::new(gradient, -3.0, 40.0);
            for z in [-3.0, 0.0, 17.5, 40.0] {
                assert_eq!(
                    mapper.color_for(z, Some("0x00ff00")),
                    Color32::from_rgb(0, 255, 0)
                );
            }
        }
    }

    #[test]
    fn invalid_override_falls_back_to_gradient() {
        let mapper = ColorMapper::new(Gradient::Linear, 0.0, 10.0);
        assert_eq!(mapper.color_for(4.0, Some("zz")), mapper.gradient_color(4.0));
        assert_eq!(mapper.color_for(4.0, Some("ff00")), mapper.gradient_color(4.0));
        assert_eq!(
            mapper.color_for(4.0, Some("0xff00001")),
            mapper.gradient_color(4.0)
        );
        assert_eq!(mapper.color_for(4.0, Some("gg0000")), mapper.gradient_color(4.0));
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(parse_hex_color("ff0000"), Some(Color32::from_rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("0XABCDEF"), Some(Color32::from_rgb(0xab, 0xcd, 0xef)));
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("0x"), None);
    }

    #[test]
    fn flat_range_uses_midpoint() {
        let mapper = ColorMapper::new(Gradient::Hsv, 7.0, 7.0);
        assert_eq!(mapper.ratio(7.0), 0.5);
        assert_eq!(mapper.ratio(-100.0), 0.5);
        assert_eq!(mapper.gradient_color(7.0), mapper.gradient_color(123.0));

        let linear = ColorMapper::new(Gradient::Linear, 2.0, 2.0);
        assert_eq!(linear.gradient_color(2.0), Color32::from_rgb(177, 150, 177));
    }

    #[test]
    fn linear_endpoints_match_anchor_colors() {
        let mapper = ColorMapper::new(Gradient::Linear, 0.0, 10.0);
        assert_eq!(mapper.gradient_color(0.0), LINEAR_LOW);
        assert_eq!(mapper.gradient_color(10.0), LINEAR_HIGH);
        assert_eq!(mapper.gradient_color(50.0), LINEAR_HIGH);
    }

    #[test]
    fn hsv_sweeps_from_blue_to_red() {
        let mapper = ColorMapper::new(Gradient::Hsv, 0.0, 1.0);

        let low = mapper.gradient_color(0.0);
        assert!(low.b() > low.r(), "low end should be blue-ish: {low:?}");

        let high = mapper.gradient_color(1.0);
        // hue 0, s 0.8, v 1.0
        assert_eq!(high.r(), 255);
        assert!((50..=51).contains(&high.g()), "{high:?}");
        assert_eq!(high.g(), high.b());
    }
}
