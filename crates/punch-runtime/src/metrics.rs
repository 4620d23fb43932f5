//! Prometheus metrics recorder and metric name constants.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Install the Prometheus metrics recorder (global).
///
/// Returns the handle used to render the current values. Call once at
/// startup, before any metric is recorded.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("prometheus metrics recorder installed");
    Ok(handle)
}

/// Render Prometheus text format from an installed recorder.
pub fn render(handle: &PrometheusHandle) -> String {
    handle.render()
}

// Metric name constants to avoid typos across crates.

/// Units created (counter, labels: source = `manual` | `bulk`).
pub const UNITS_CREATED_TOTAL: &str = "units_created_total";
/// Whole-`trades` writes (counter, labels: op).
pub const TASK_WRITES_TOTAL: &str = "task_writes_total";
/// Suggestion gateway calls (counter).
pub const SUGGESTION_REQUESTS_TOTAL: &str = "suggestion_requests_total";
/// Suggestion gateway failures (counter, labels: reason).
pub const SUGGESTION_FAILURES_TOTAL: &str = "suggestion_failures_total";
/// Bulk generations stopped by a failed create (counter).
pub const BULK_GENERATION_HALTS_TOTAL: &str = "bulk_generation_halts_total";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_recorder_renders_counters() {
        // Scoped to this thread; the global recorder is left alone.
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        {
            let _guard = ::metrics::set_default_local_recorder(&recorder);
            ::metrics::counter!(TASK_WRITES_TOTAL, "op" => "toggle").increment(2);
        }
        let output = render(&handle);
        assert!(output.contains(r#"task_writes_total{op="toggle"} 2"#), "{output}");
    }

    #[test]
    fn metric_constants_are_snake_case() {
        let names = [
            UNITS_CREATED_TOTAL,
            TASK_WRITES_TOTAL,
            SUGGESTION_REQUESTS_TOTAL,
            SUGGESTION_FAILURES_TOTAL,
            BULK_GENERATION_HALTS_TOTAL,
        ];
        for name in names {
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "{name}"
            );
            assert!(name.ends_with("_total"));
        }
    }
}
