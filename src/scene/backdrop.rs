//! Static curve backdrop: the two branches of `y² = x³ + 7` and a
//! reference grid behind them.

use glam::Vec3;

use crate::options::ThemeOptions;
use crate::util::color::Color;

/// Constant term of the short Weierstrass curve `y² = x³ + b`.
pub const CURVE_B: f32 = 7.0;
/// Uniform scale applied to plotted curve coordinates.
pub const CURVE_SCALE: f32 = 1.5;

/// Inclusive x range sampled at a fixed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanRange {
    /// First sampled x.
    pub start: f32,
    /// Last x that may be sampled.
    pub end: f32,
    /// Distance between samples.
    pub step: f32,
}

impl ScanRange {
    /// Range the backdrop is drawn over.
    pub const BACKDROP: Self = Self {
        start: -1.9,
        end: 4.0,
        step: 0.05,
    };

    /// Sample positions. Computed from an integer index so the last
    /// sample does not drift with accumulated rounding.
    pub fn samples(self) -> impl Iterator<Item = f32> {
        let count = if self.step > 0.0 && self.end >= self.start {
            ((self.end - self.start) / self.step + 1e-3).floor() as usize + 1
        } else {
            0
        };
        (0..count).map(move |i| self.start + i as f32 * self.step)
    }
}

/// Right-hand side of the curve equation, `x³ + 7`.
#[must_use]
pub fn curve_y_squared(x: f32) -> f32 {
    x * x * x + CURVE_B
}

/// Upper and lower curve branches over `range`, scaled by `scale`.
///
/// x values where `x³ + 7` is negative have no real point and are skipped
/// on both branches.
#[must_use]
pub fn plot_branches(range: ScanRange, scale: f32) -> (Vec<Vec3>, Vec<Vec3>) {
    let mut upper = Vec::new();
    let mut lower = Vec::new();
    for x in range.samples() {
        let y2 = curve_y_squared(x);
        if y2 < 0.0 {
            continue;
        }
        let y = y2.sqrt();
        upper.push(Vec3::new(x * scale, y * scale, 0.0));
        lower.push(Vec3::new(x * scale, -y * scale, 0.0));
    }
    (upper, lower)
}

/// A single grid line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    /// Segment start.
    pub start: Vec3,
    /// Segment end.
    pub end: Vec3,
    /// Line color.
    pub color: Color,
}

/// Square grid lying in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    /// Edge length.
    pub size: f32,
    /// Cells per edge.
    pub divisions: u32,
    /// Plane depth.
    pub z: f32,
    /// Color of the two lines through the center.
    pub center: Color,
    /// Color of every other line.
    pub line: Color,
}

impl GridSpec {
    /// Grid with the given colors at the default size and depth.
    #[must_use]
    pub fn with_colors(center: Color, line: Color) -> Self {
        Self {
            size: 30.0,
            divisions: 30,
            z: -1.0,
            center,
            line,
        }
    }

    /// Vertical then horizontal line for each division boundary.
    #[must_use]
    pub fn lines(&self) -> Vec<GridLine> {
        let half = self.size / 2.0;
        let cell = self.size / self.divisions.max(1) as f32;
        let mid = self.divisions / 2;
        let mut lines = Vec::with_capacity((self.divisions as usize + 1) * 2);
        for i in 0..=self.divisions {
            let k = -half + i as f32 * cell;
            let color = if self.divisions % 2 == 0 && i == mid {
                self.center
            } else {
                self.line
            };
            lines.push(GridLine {
                start: Vec3::new(k, -half, self.z),
                end: Vec3::new(k, half, self.z),
                color,
            });
            lines.push(GridLine {
                start: Vec3::new(-half, k, self.z),
                end: Vec3::new(half, k, self.z),
                color,
            });
        }
        lines
    }
}

/// Decorative geometry drawn once when a scene is created.
#[derive(Debug, Clone, PartialEq)]
pub struct Backdrop {
    /// Branch with `y ≥ 0`, as a line strip.
    pub upper: Vec<Vec3>,
    /// Branch with `y ≤ 0`, as a line strip.
    pub lower: Vec<Vec3>,
    /// Curve color (the scene theme).
    pub curve_color: Color,
    /// Curve opacity.
    pub curve_opacity: f32,
    /// Reference grid segments.
    pub grid: Vec<GridLine>,
}

impl Backdrop {
    /// Plot the curve and grid for a scene themed with `theme_color`.
    #[must_use]
    pub fn new(theme_color: Color, theme: &ThemeOptions) -> Self {
        let (upper, lower) = plot_branches(ScanRange::BACKDROP, CURVE_SCALE);
        let grid = GridSpec::with_colors(theme.grid_center, theme.grid_line);
        Self {
            upper,
            lower,
            curve_color: theme_color,
            curve_opacity: theme.curve_opacity,
            grid: grid.lines(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branches_satisfy_curve_equation() {
        let (upper, lower) = plot_branches(ScanRange::BACKDROP, CURVE_SCALE);
        assert_eq!(upper.len(), lower.len());
        assert!(!upper.is_empty());
        for (u, l) in upper.iter().zip(&lower) {
            let x = u.x / CURVE_SCALE;
            let y = curve_y_squared(x).sqrt();
            assert!((u.y / CURVE_SCALE - y).abs() < 1e-4);
            assert!((l.y / CURVE_SCALE + y).abs() < 1e-4);
            assert_eq!(u.x, l.x);
            assert_eq!(u.z, 0.0);
        }
    }

    #[test]
    fn backdrop_range_covers_both_ends() {
        let xs: Vec<f32> = ScanRange::BACKDROP.samples().collect();
        assert_eq!(xs.len(), 119);
        assert!((xs[0] + 1.9).abs() < 1e-6);
        assert!((xs[xs.len() - 1] - 4.0).abs() < 1e-4);
    }

    #[test]
    fn no_points_where_right_hand_side_is_negative() {
        let range = ScanRange {
            start: -3.0,
            end: 1.0,
            step: 0.05,
        };
        let (upper, lower) = plot_branches(range, 1.0);
        for p in upper.iter().chain(&lower) {
            assert!(curve_y_squared(p.x) >= -1e-4);
        }
        // cbrt(7) ≈ 1.913, so everything left of -1.913 is dropped
        assert!(upper.iter().all(|p| p.x > -1.92));
        let sampled = range.samples().count();
        assert!(upper.len() < sampled);
    }

    #[test]
    fn grid_has_center_lines() {
        let spec = GridSpec::with_colors(
            Color::from_hex(0x333333),
            Color::from_hex(0x111111),
        );
        let lines = spec.lines();
        assert_eq!(lines.len(), 62);
        let centers: Vec<_> =
            lines.iter().filter(|l| l.color == spec.center).collect();
        assert_eq!(centers.len(), 2);
        assert!(lines.iter().all(|l| l.start.z == -1.0));
    }
}
