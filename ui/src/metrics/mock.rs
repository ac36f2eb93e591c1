use crate::core::format;
use crate::t;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyPoint {
    pub stage: &'static str,
    pub millis: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn label(self) -> String {
        match self {
            Sentiment::Positive => t!("sentiment-positive"),
            Sentiment::Neutral => t!("sentiment-neutral"),
            Sentiment::Negative => t!("sentiment-negative"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentSlice {
    pub sentiment: Sentiment,
    pub percent: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumePoint {
    pub day: &'static str,
    pub calls: f64,
    pub avg_minutes: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyPoint {
    pub agent: &'static str,
    pub percent: f64,
}

pub fn latency() -> Vec<LatencyPoint> {
    [("STT", 245.0), ("LLM", 385.0), ("TTS", 165.0), ("Total", 795.0)]
        .into_iter()
        .map(|(stage, millis)| LatencyPoint { stage, millis })
        .collect()
}

pub fn sentiment() -> Vec<SentimentSlice> {
    vec![
        SentimentSlice {
            sentiment: Sentiment::Positive,
            percent: 65.0,
            color: "#10b981",
        },
        SentimentSlice {
            sentiment: Sentiment::Neutral,
            percent: 25.0,
            color: "#f59e0b",
        },
        SentimentSlice {
            sentiment: Sentiment::Negative,
            percent: 10.0,
            color: "#ef4444",
        },
    ]
}

pub fn call_volume() -> Vec<VolumePoint> {
    [
        ("Dec 23", 1234.0, 4.2),
        ("Dec 24", 1456.0, 4.5),
        ("Dec 25", 892.0, 3.8),
        ("Dec 26", 2145.0, 5.1),
        ("Dec 27", 1987.0, 4.9),
        ("Dec 28", 2456.0, 5.3),
        ("Dec 29", 2234.0, 5.0),
    ]
    .into_iter()
    .map(|(day, calls, avg_minutes)| VolumePoint {
        day,
        calls,
        avg_minutes,
    })
    .collect()
}

pub fn agent_accuracy() -> Vec<AccuracyPoint> {
    [
        ("Agent A", 96.0),
        ("Agent B", 92.0),
        ("Agent C", 98.0),
        ("Agent D", 94.0),
        ("Agent E", 91.0),
    ]
    .into_iter()
    .map(|(agent, percent)| AccuracyPoint { agent, percent })
    .collect()
}

/// The headline tiles across the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    SuccessRate,
    AvgLatency,
    TotalCalls,
    Sentiment,
    SttAccuracy,
}

impl TileKind {
    pub const ALL: [TileKind; 5] = [
        TileKind::SuccessRate,
        TileKind::AvgLatency,
        TileKind::TotalCalls,
        TileKind::Sentiment,
        TileKind::SttAccuracy,
    ];

    pub fn label(self) -> String {
        match self {
            TileKind::SuccessRate => t!("tile-success-rate"),
            TileKind::AvgLatency => t!("tile-avg-latency"),
            TileKind::TotalCalls => t!("tile-total-calls"),
            TileKind::Sentiment => t!("tile-sentiment"),
            TileKind::SttAccuracy => t!("tile-stt-accuracy"),
        }
    }

    pub fn note(self) -> String {
        match self {
            TileKind::SuccessRate => t!("tile-success-rate-note"),
            TileKind::AvgLatency => t!("tile-avg-latency-note"),
            TileKind::TotalCalls => t!("tile-total-calls-note"),
            TileKind::Sentiment => t!("tile-sentiment-note"),
            TileKind::SttAccuracy => t!("tile-stt-accuracy-note"),
        }
    }

    /// CSS modifier used for the value colour.
    pub fn tone(self) -> &'static str {
        match self {
            TileKind::SuccessRate => "green",
            TileKind::AvgLatency => "blue",
            TileKind::TotalCalls => "purple",
            TileKind::Sentiment => "amber",
            TileKind::SttAccuracy => "cyan",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricTile {
    pub kind: TileKind,
    pub value: String,
}

pub fn tiles() -> Vec<MetricTile> {
    let positive = sentiment()
        .iter()
        .find(|slice| slice.sentiment == Sentiment::Positive)
        .map_or(0.0, |slice| slice.percent);
    let total_latency = latency()
        .iter()
        .find(|point| point.stage == "Total")
        .map_or(0.0, |point| point.millis);

    TileKind::ALL
        .into_iter()
        .map(|kind| {
            let value = match kind {
                TileKind::SuccessRate => format::format_percent(94.0),
                TileKind::AvgLatency => format::format_ms(total_latency),
                TileKind::TotalCalls => format::format_compact(12_400),
                TileKind::Sentiment => format::format_percent(positive),
                TileKind::SttAccuracy => format::format_percent(96.0),
            };
            MetricTile { kind, value }
        })
        .collect()
}
