use api::{Dataset, Identity, StoreBackend};
use dioxus::prelude::*;

use crate::charts::{
    AgentAccuracyChart, CallSuccessChart, CallVolumeChart, LatencyChart, SentimentChart,
};
use crate::components::AppNavbar;
use crate::flow::{DatasetFlowModal, SaveOutcome};
use crate::metrics::{self, MetricTile};
use crate::{i18n, t};

/// What the dashboard knows between saves: the dataset on screen, who
/// saved it, and whether the editing flow is showing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShellState {
    pub dataset: Dataset,
    pub identity: Option<Identity>,
    pub flow_open: bool,
}

impl ShellState {
    pub fn open_flow(&mut self) {
        self.flow_open = true;
    }

    pub fn close_flow(&mut self) {
        self.flow_open = false;
    }

    /// Take over a freshly saved dataset and its owner, then close the flow.
    pub fn adopt(&mut self, outcome: SaveOutcome) {
        tracing::info!(identity = %outcome.identity, "dashboard adopted saved dataset");
        self.identity = Some(outcome.identity);
        self.dataset = outcome.dataset;
        self.flow_open = false;
    }

    pub fn header_label(&self) -> String {
        match &self.identity {
            Some(identity) => t!("header-manage", email = identity.to_string()),
            None => t!("header-customize"),
        }
    }
}

#[component]
pub fn Dashboard() -> Element {
    let _locale = i18n::use_locale();
    use_context_provider(StoreBackend::from_env);
    let mut shell = use_signal(ShellState::default);
    let state = shell();

    rsx! {
        document::Title { {t!("app-title")} }

        AppNavbar {
            button {
                r#type: "button",
                class: "button button--accent",
                onclick: move |_| shell.with_mut(ShellState::open_flow),
                {state.header_label()}
            }
        }

        main { class: "dashboard",
            section { class: "dashboard__tiles",
                for tile in metrics::tiles() {
                    MetricTileCard { key: "{tile.kind.tone()}", tile }
                }
            }

            section { class: "dashboard__grid",
                ChartCard {
                    title: t!("chart-call-success"),
                    note: t!("chart-call-success-note"),
                    tone: "green",
                    CallSuccessChart { data: Some(state.dataset.clone()) }
                }
                ChartCard {
                    title: t!("chart-latency"),
                    note: t!("chart-latency-note"),
                    tone: "blue",
                    LatencyChart { data: metrics::latency() }
                }
                ChartCard {
                    title: t!("chart-call-volume"),
                    note: t!("chart-call-volume-note"),
                    tone: "purple",
                    CallVolumeChart { data: metrics::call_volume() }
                }
                ChartCard {
                    title: t!("chart-sentiment"),
                    note: t!("chart-sentiment-note"),
                    tone: "amber",
                    SentimentChart { data: metrics::sentiment() }
                }
                ChartCard {
                    title: t!("chart-agent-accuracy"),
                    note: t!("chart-agent-accuracy-note"),
                    tone: "cyan",
                    wide: true,
                    AgentAccuracyChart { data: metrics::agent_accuracy() }
                }
            }

            section { class: "dashboard__about",
                h3 { {t!("about-title")} }
                p { {t!("about-body")} }
            }
        }

        if state.flow_open {
            DatasetFlowModal {
                on_close: move |_| shell.with_mut(ShellState::close_flow),
                on_save: move |outcome: SaveOutcome| shell.with_mut(|s| s.adopt(outcome)),
            }
        }
    }
}

#[component]
fn MetricTileCard(tile: MetricTile) -> Element {
    let tone = tile.kind.tone();
    rsx! {
        div { class: "tile",
            div { class: "tile__label", {tile.kind.label()} }
            div { class: "tile__value tile__value--{tone}", "{tile.value}" }
            div { class: "tile__note", {tile.kind.note()} }
        }
    }
}

/// Titled panel around one chart.
#[component]
pub fn ChartCard(
    title: String,
    note: String,
    tone: &'static str,
    #[props(default)] wide: bool,
    children: Element,
) -> Element {
    let class = if wide {
        "chart-card chart-card--wide"
    } else {
        "chart-card"
    };
    rsx! {
        article { class,
            h3 { class: "chart-card__title",
                span { class: "chart-card__dot chart-card__dot--{tone}" }
                "{title}"
            }
            {children}
            p { class: "chart-card__note", "{note}" }
        }
    }
}
