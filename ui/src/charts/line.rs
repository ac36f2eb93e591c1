use api::{Dataset, RateField};
use dioxus::prelude::*;

use super::geometry::{line_points, polyline, Frame};
use super::{legend, x_labels, y_axis, AxisSide};
use crate::{i18n, t};

const FRAME: Frame = Frame::new(520.0, 300.0);
const SUCCESS_COLOR: &str = "#10b981";
const FAILURE_COLOR: &str = "#ef4444";

/// Success and failure rate over the day. Falls back to the default
/// dataset when nothing has been saved yet.
#[component]
pub fn CallSuccessChart(data: Option<Dataset>) -> Element {
    let _locale = i18n::use_locale();
    let dataset = data.unwrap_or_default();
    let scale = FRAME.y_scale(0.0, 100.0);
    let labels: Vec<String> = dataset.labels().map(str::to_string).collect();

    let series = [
        (RateField::Success, SUCCESS_COLOR, t!("series-success-rate")),
        (RateField::Failure, FAILURE_COLOR, t!("series-failure-rate")),
    ]
    .map(|(field, color, name)| {
        let points = line_points(&dataset.series(field), &FRAME, &scale);
        (field, color, name, points)
    });
    let legend_items: Vec<(String, &'static str)> = series
        .iter()
        .map(|(_, color, name, _)| (name.clone(), *color))
        .collect();

    rsx! {
        div { class: "chart",
            svg {
                class: "chart__svg",
                view_box: FRAME.view_box(),
                role: "img",
                "aria-label": t!("chart-call-success"),
                {y_axis(&FRAME, &scale, 4, AxisSide::Left)}
                {x_labels(&FRAME, &labels)}
                for (field, color, _, points) in series.iter() {
                    g { key: "{field.as_str()}",
                        polyline {
                            points: polyline(points),
                            fill: "none",
                            stroke: *color,
                            "stroke-width": "2",
                        }
                        for (i, point) in points.iter().enumerate() {
                            circle { key: "{i}", cx: "{point.x}", cy: "{point.y}", r: "4", fill: *color }
                        }
                    }
                }
            }
            {legend(&legend_items)}
        }
    }
}
