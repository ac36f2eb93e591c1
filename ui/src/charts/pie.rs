use dioxus::prelude::*;

use super::geometry::pie_wedges;
use crate::core::format::format_percent;
use crate::metrics::SentimentSlice;
use crate::{i18n, t};

const SIZE: f64 = 300.0;
const RADIUS: f64 = 110.0;

/// Share of callers per sentiment, labelled "Positive: 65%".
#[component]
pub fn SentimentChart(data: Vec<SentimentSlice>) -> Element {
    let _locale = i18n::use_locale();
    let center = SIZE / 2.0;
    let values: Vec<f64> = data.iter().map(|slice| slice.percent).collect();
    let wedges = pie_wedges(&values, center, center, RADIUS);

    rsx! {
        div { class: "chart chart--pie",
            svg {
                class: "chart__svg",
                view_box: "0 0 {SIZE} {SIZE}",
                role: "img",
                "aria-label": t!("chart-sentiment"),
                for (i, (wedge, slice)) in wedges.iter().zip(&data).enumerate() {
                    g { key: "{i}",
                        path { d: "{wedge.path}", fill: slice.color, stroke: "#111827", "stroke-width": "1" }
                        if wedge.fraction > 0.0 {
                            text {
                                x: "{wedge.label_x}",
                                y: "{wedge.label_y}",
                                fill: "#f9fafb",
                                "font-size": "12",
                                "text-anchor": "middle",
                                "{slice.sentiment.label()}: {format_percent(slice.percent)}"
                            }
                        }
                    }
                }
            }
        }
    }
}
