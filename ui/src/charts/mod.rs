//! SVG chart components. Each one is stateless: it maps the data it is
//! given onto [`geometry`] and renders the result.

pub mod geometry;

mod bars;
mod line;
mod pie;

pub use bars::{AgentAccuracyChart, CallVolumeChart, LatencyChart};
pub use line::CallSuccessChart;
pub use pie::SentimentChart;

use dioxus::prelude::*;

use crate::core::format::format_tick;
use geometry::{band_centers, ticks, Frame, LinearScale};

pub(crate) const GRID_COLOR: &str = "#374151";
pub(crate) const AXIS_COLOR: &str = "#9ca3af";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AxisSide {
    Left,
    Right,
}

/// Horizontal grid lines plus tick labels on one side of the plot.
pub(crate) fn y_axis(frame: &Frame, scale: &LinearScale, steps: usize, side: AxisSide) -> Element {
    let (min, max) = scale.domain();
    let (x, anchor) = match side {
        AxisSide::Left => (frame.plot_left() - 6.0, "end"),
        AxisSide::Right => (frame.plot_right() + 6.0, "start"),
    };
    let left = frame.plot_left();
    let right = frame.plot_right();

    rsx! {
        for (i, value) in ticks(min, max, steps).into_iter().enumerate() {
            g { key: "{i}",
                if side == AxisSide::Left {
                    line {
                        x1: "{left}",
                        y1: "{scale.map(value)}",
                        x2: "{right}",
                        y2: "{scale.map(value)}",
                        stroke: GRID_COLOR,
                        "stroke-dasharray": "3 3",
                    }
                }
                text {
                    x: "{x}",
                    y: "{scale.map(value) + 4.0}",
                    fill: AXIS_COLOR,
                    "font-size": "11",
                    "text-anchor": anchor,
                    "{format_tick(value)}"
                }
            }
        }
    }
}

/// Category labels under each band.
pub(crate) fn x_labels(frame: &Frame, labels: &[String]) -> Element {
    let y = frame.plot_bottom() + 18.0;
    rsx! {
        line {
            x1: "{frame.plot_left()}",
            y1: "{frame.plot_bottom()}",
            x2: "{frame.plot_right()}",
            y2: "{frame.plot_bottom()}",
            stroke: AXIS_COLOR,
        }
        for (i, (x, label)) in band_centers(labels.len(), frame).into_iter().zip(labels).enumerate() {
            text {
                key: "{i}",
                x: "{x}",
                y: "{y}",
                fill: AXIS_COLOR,
                "font-size": "11",
                "text-anchor": "middle",
                "{label}"
            }
        }
    }
}

/// Colour swatches with series names, rendered below the SVG.
pub(crate) fn legend(items: &[(String, &'static str)]) -> Element {
    rsx! {
        ul { class: "chart-legend",
            for (name, color) in items.iter() {
                li { key: "{name}", class: "chart-legend__item",
                    span { class: "chart-legend__swatch", style: "background:{color}" }
                    "{name}"
                }
            }
        }
    }
}
