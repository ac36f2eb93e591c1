//! Pure geometry for the SVG charts: scales, ticks, polyline points, bar
//! rectangles and pie wedges. Nothing here touches the renderer.

use std::f64::consts::{FRAC_PI_2, TAU};

/// Drawing surface in SVG user units, with room reserved for axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub pad_left: f64,
    pub pad_right: f64,
    pub pad_top: f64,
    pub pad_bottom: f64,
}

impl Frame {
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            pad_left: 44.0,
            pad_right: 16.0,
            pad_top: 16.0,
            pad_bottom: 32.0,
        }
    }

    /// Same frame with a wider right margin for a secondary axis.
    pub const fn with_right_axis(mut self) -> Self {
        self.pad_right = 44.0;
        self
    }

    pub fn plot_left(&self) -> f64 {
        self.pad_left
    }

    pub fn plot_right(&self) -> f64 {
        self.width - self.pad_right
    }

    pub fn plot_top(&self) -> f64 {
        self.pad_top
    }

    pub fn plot_bottom(&self) -> f64 {
        self.height - self.pad_bottom
    }

    pub fn plot_width(&self) -> f64 {
        (self.plot_right() - self.plot_left()).max(0.0)
    }

    pub fn plot_height(&self) -> f64 {
        (self.plot_bottom() - self.plot_top()).max(0.0)
    }

    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }

    /// Vertical scale spanning the plot area for `[min, max]`.
    pub fn y_scale(&self, min: f64, max: f64) -> LinearScale {
        LinearScale::new((min, max), (self.plot_bottom(), self.plot_top()))
    }
}

/// Linear map from a data domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Map `value`, clamped to the domain. A zero-width domain maps
    /// everything to the start of the range.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span.abs() < f64::EPSILON || !value.is_finite() {
            return r0;
        }
        let t = ((value - d0) / span).clamp(0.0, 1.0);
        r0 + t * (r1 - r0)
    }
}

/// Round `max` up to the next 1, 2, 5 × 10ⁿ step so axes end on a
/// readable number.
pub fn nice_max(max: f64) -> f64 {
    if !max.is_finite() || max <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(max.log10().floor());
    let fraction = max / magnitude;
    let step = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    step * magnitude
}

/// `count + 1` evenly spaced tick values from `min` to `max` inclusive.
pub fn ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return vec![min];
    }
    let step = (max - min) / count as f64;
    (0..=count).map(|i| min + step * i as f64).collect()
}

/// Horizontal centre of each of `count` equal bands across the plot.
pub fn band_centers(count: usize, frame: &Frame) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let band = frame.plot_width() / count as f64;
    (0..count)
        .map(|i| frame.plot_left() + band * (i as f64 + 0.5))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One point per value, spread across the plot's bands.
pub fn line_points(values: &[f64], frame: &Frame, scale: &LinearScale) -> Vec<Point> {
    band_centers(values.len(), frame)
        .into_iter()
        .zip(values)
        .map(|(x, &value)| Point {
            x,
            y: scale.map(value),
        })
        .collect()
}

/// Format points for an SVG `polyline` `points` attribute.
pub fn polyline(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{:.1},{:.1}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BarRect {
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// Bars for one series. With `group_count > 1` each band is split so
/// series `group_index` sits beside its siblings.
pub fn bar_rects(
    values: &[f64],
    frame: &Frame,
    scale: &LinearScale,
    group_index: usize,
    group_count: usize,
) -> Vec<BarRect> {
    if values.is_empty() || group_count == 0 {
        return Vec::new();
    }
    let band = frame.plot_width() / values.len() as f64;
    let inner = band * 0.7;
    let width = inner / group_count as f64;
    let baseline = scale.map(scale.domain().0);

    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let band_start = frame.plot_left() + band * i as f64 + (band - inner) / 2.0;
            let top = scale.map(value);
            BarRect {
                x: band_start + width * group_index as f64,
                y: top.min(baseline),
                width,
                height: (baseline - top).max(0.0),
            }
        })
        .collect()
}

/// A pie slice ready for an SVG `path`, plus where to put its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub path: String,
    pub fraction: f64,
    pub label_x: f64,
    pub label_y: f64,
}

/// Slices for `values` starting at twelve o'clock, clockwise. Negative
/// and non-finite values count as zero; an all-zero input yields nothing.
pub fn pie_wedges(values: &[f64], cx: f64, cy: f64, radius: f64) -> Vec<Wedge> {
    let cleaned: Vec<f64> = values
        .iter()
        .map(|v| if v.is_finite() && *v > 0.0 { *v } else { 0.0 })
        .collect();
    let total: f64 = cleaned.iter().sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let point = |angle: f64, r: f64| (cx + r * angle.cos(), cy + r * angle.sin());
    let mut start = -FRAC_PI_2;

    cleaned
        .into_iter()
        .map(|value| {
            let fraction = value / total;
            let sweep = fraction * TAU;
            let end = start + sweep;
            let (sx, sy) = point(start, radius);
            let (ex, ey) = point(end, radius);

            let path = if fraction >= 1.0 {
                // A single arc cannot close on itself; draw two halves.
                let (mx, my) = point(start + TAU / 2.0, radius);
                format!(
                    "M {sx:.2} {sy:.2} A {radius} {radius} 0 1 1 {mx:.2} {my:.2} \
                     A {radius} {radius} 0 1 1 {sx:.2} {sy:.2} Z"
                )
            } else if fraction <= 0.0 {
                String::new()
            } else {
                let large = if sweep > TAU / 2.0 { 1 } else { 0 };
                format!(
                    "M {cx:.2} {cy:.2} L {sx:.2} {sy:.2} \
                     A {radius} {radius} 0 {large} 1 {ex:.2} {ey:.2} Z"
                )
            };

            let (label_x, label_y) = point(start + sweep / 2.0, radius * 0.65);
            start = end;
            Wedge {
                path,
                fraction,
                label_x,
                label_y,
            }
        })
        .collect()
}
