pub mod metrics;
pub mod sink;

pub use sink::{ExecKind, MetricsEvent, MetricsSink, metrics_report, metrics_reset_all};
