//! Fixed demo metrics shown beside the editable call-success chart.

pub mod mock;

pub use mock::{
    agent_accuracy, call_volume, latency, sentiment, tiles, AccuracyPoint, LatencyPoint,
    MetricTile, Sentiment, SentimentSlice, TileKind, VolumePoint,
};
