use dioxus::prelude::*;

use super::geometry::{bar_rects, nice_max, BarRect, Frame};
use super::{legend, x_labels, y_axis, AxisSide};
use crate::metrics::{AccuracyPoint, LatencyPoint, VolumePoint};
use crate::{i18n, t};

const FRAME: Frame = Frame::new(520.0, 300.0);

fn bars(rects: &[BarRect], color: &'static str) -> Element {
    rsx! {
        for (i, bar) in rects.iter().enumerate() {
            rect {
                key: "{i}",
                x: "{bar.x}",
                y: "{bar.y}",
                width: "{bar.width}",
                height: "{bar.height}",
                rx: "6",
                fill: color,
            }
        }
    }
}

/// Per-stage processing time in milliseconds.
#[component]
pub fn LatencyChart(data: Vec<LatencyPoint>) -> Element {
    let _locale = i18n::use_locale();
    let values: Vec<f64> = data.iter().map(|p| p.millis).collect();
    let labels: Vec<String> = data.iter().map(|p| p.stage.to_string()).collect();
    let max = nice_max(values.iter().copied().fold(0.0, f64::max));
    let scale = FRAME.y_scale(0.0, max);
    let rects = bar_rects(&values, &FRAME, &scale, 0, 1);

    rsx! {
        div { class: "chart",
            svg {
                class: "chart__svg",
                view_box: FRAME.view_box(),
                role: "img",
                "aria-label": t!("chart-latency"),
                {y_axis(&FRAME, &scale, 4, AxisSide::Left)}
                {x_labels(&FRAME, &labels)}
                {bars(&rects, "#3b82f6")}
            }
            {legend(&[(t!("series-latency"), "#3b82f6")])}
        }
    }
}

/// Daily calls and average duration, each on its own axis.
#[component]
pub fn CallVolumeChart(data: Vec<VolumePoint>) -> Element {
    let _locale = i18n::use_locale();
    let frame = FRAME.with_right_axis();
    let calls: Vec<f64> = data.iter().map(|p| p.calls).collect();
    let minutes: Vec<f64> = data.iter().map(|p| p.avg_minutes).collect();
    let labels: Vec<String> = data.iter().map(|p| p.day.to_string()).collect();

    let calls_scale = frame.y_scale(0.0, nice_max(calls.iter().copied().fold(0.0, f64::max)));
    let minutes_scale = frame.y_scale(0.0, nice_max(minutes.iter().copied().fold(0.0, f64::max)));
    let call_rects = bar_rects(&calls, &frame, &calls_scale, 0, 2);
    let minute_rects = bar_rects(&minutes, &frame, &minutes_scale, 1, 2);

    rsx! {
        div { class: "chart",
            svg {
                class: "chart__svg",
                view_box: frame.view_box(),
                role: "img",
                "aria-label": t!("chart-call-volume"),
                {y_axis(&frame, &calls_scale, 4, AxisSide::Left)}
                {y_axis(&frame, &minutes_scale, 4, AxisSide::Right)}
                {x_labels(&frame, &labels)}
                {bars(&call_rects, "#8b5cf6")}
                {bars(&minute_rects, "#06b6d4")}
            }
            {legend(&[
                (t!("series-total-calls"), "#8b5cf6"),
                (t!("series-avg-duration"), "#06b6d4"),
            ])}
        }
    }
}

/// Per-agent accuracy on a zoomed 85–100 axis.
#[component]
pub fn AgentAccuracyChart(data: Vec<AccuracyPoint>) -> Element {
    let _locale = i18n::use_locale();
    let values: Vec<f64> = data.iter().map(|p| p.percent).collect();
    let labels: Vec<String> = data.iter().map(|p| p.agent.to_string()).collect();
    let scale = FRAME.y_scale(85.0, 100.0);
    let rects = bar_rects(&values, &FRAME, &scale, 0, 1);

    rsx! {
        div { class: "chart",
            svg {
                class: "chart__svg",
                view_box: FRAME.view_box(),
                role: "img",
                "aria-label": t!("chart-agent-accuracy"),
                {y_axis(&FRAME, &scale, 3, AxisSide::Left)}
                {x_labels(&FRAME, &labels)}
                {bars(&rects, "#f59e0b")}
            }
            {legend(&[(t!("series-accuracy"), "#f59e0b")])}
        }
    }
}
