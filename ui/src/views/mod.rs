mod dashboard;

pub use dashboard::{ChartCard, Dashboard, ShellState};
