//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{series_color, ChartPlotter};
pub use renderer::{slugify, StaticChartRenderer};

/// Color palette for categories and overlaid series
pub const PALETTE_RGB: [(u8, u8, u8); 10] = [
    (52, 152, 219),  // Blue
    (231, 76, 60),   // Red
    (46, 204, 113),  // Green
    (155, 89, 182),  // Purple
    (243, 156, 18),  // Orange
    (26, 188, 156),  // Teal
    (233, 30, 99),   // Pink
    (0, 188, 212),   // Cyan
    (121, 85, 72),   // Brown
    (96, 125, 139),  // Blue Grey
];

/// Diverging heatmap colour: blue at -1, white at 0, red at +1.
/// NaN cells are light grey.
pub fn heat_rgb(value: f64) -> (u8, u8, u8) {
    if value.is_nan() {
        return (220, 220, 220);
    }
    let v = value.clamp(-1.0, 1.0);
    let (target, t) = if v >= 0.0 {
        ((180.0, 4.0, 38.0), v)
    } else {
        ((59.0, 76.0, 192.0), -v)
    };
    let mix = |c: f64| (255.0 + (c - 255.0) * t).round() as u8;
    (mix(target.0), mix(target.1), mix(target.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_rgb_endpoints() {
        assert_eq!(heat_rgb(0.0), (255, 255, 255));
        assert_eq!(heat_rgb(1.0), (180, 4, 38));
        assert_eq!(heat_rgb(-1.0), (59, 76, 192));
        assert_eq!(heat_rgb(f64::NAN), (220, 220, 220));
        assert_eq!(heat_rgb(3.0), heat_rgb(1.0));
    }
}
