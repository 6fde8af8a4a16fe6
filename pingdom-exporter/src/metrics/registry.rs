//! Prometheus backed metric sink.
//!
//! Owns a dedicated `prometheus::Registry` with the five exporter series
//! registered once at construction. On Linux the standard `process_*` series
//! (CPU time, memory, file descriptors, start time) are registered as well. Metric values are atomics and the metric
//! vectors guard their children with internal read/write locks, so scrapes can
//! gather concurrently with poller writes.

use prometheus::{
    Encoder, Gauge, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    TEXT_FORMAT,
};

use super::{GaugeSeries, HistogramSeries, MetricSink};
use crate::error::{ExporterError, ExporterResult};
use crate::mapper::CHECK_LABEL_NAMES;

/// Initial capacity of the render buffer.
const RENDER_BUFFER_CAP: usize = 16 * 1024;

/// Metric sink backed by the `prometheus` crate.
#[derive(Clone)]
pub struct PrometheusSink {
    registry: Registry,
    up: Gauge,
    check_status: GaugeVec,
    check_response_time: GaugeVec,
    check_response_time_histogram: HistogramVec,
    check_status_histogram: HistogramVec,
}

impl PrometheusSink {
    /// Create the sink and register all series.
    pub fn new() -> ExporterResult<Self> {
        let registry = Registry::new();

        let up = Gauge::with_opts(Opts::new(GaugeSeries::Up.name(), GaugeSeries::Up.help()))?;
        let check_status = check_gauge(GaugeSeries::CheckStatus)?;
        let check_response_time = check_gauge(GaugeSeries::CheckResponseTime)?;
        let check_response_time_histogram = check_histogram(HistogramSeries::CheckResponseTime)?;
        let check_status_histogram = check_histogram(HistogramSeries::CheckStatus)?;

        registry.register(Box::new(up.clone()))?;
        registry.register(Box::new(check_status.clone()))?;
        registry.register(Box::new(check_response_time.clone()))?;
        registry.register(Box::new(check_response_time_histogram.clone()))?;
        registry.register(Box::new(check_status_histogram.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            up,
            check_status,
            check_response_time,
            check_response_time_histogram,
            check_status_histogram,
        })
    }

    fn gauge_vec(&self, series: GaugeSeries) -> Option<&GaugeVec> {
        match series {
            GaugeSeries::Up => None,
            GaugeSeries::CheckStatus => Some(&self.check_status),
            GaugeSeries::CheckResponseTime => Some(&self.check_response_time),
        }
    }

    fn histogram_vec(&self, series: HistogramSeries) -> &HistogramVec {
        match series {
            HistogramSeries::CheckResponseTime => &self.check_response_time_histogram,
            HistogramSeries::CheckStatus => &self.check_status_histogram,
        }
    }
}

fn check_gauge(series: GaugeSeries) -> ExporterResult<GaugeVec> {
    Ok(GaugeVec::new(
        Opts::new(series.name(), series.help()),
        &CHECK_LABEL_NAMES,
    )?)
}

fn check_histogram(series: HistogramSeries) -> ExporterResult<HistogramVec> {
    Ok(HistogramVec::new(
        HistogramOpts::new(series.name(), series.help()).buckets(series.buckets()),
        &CHECK_LABEL_NAMES,
    )?)
}

impl MetricSink for PrometheusSink {
    fn set_gauge(&self, series: GaugeSeries, labels: &[&str], value: f64) -> ExporterResult<()> {
        match self.gauge_vec(series) {
            Some(vec) => vec.get_metric_with_label_values(labels)?.set(value),
            None => {
                if !labels.is_empty() {
                    return Err(ExporterError::Metrics(
                        prometheus::Error::InconsistentCardinality {
                            expect: 0,
                            got: labels.len(),
                        },
                    ));
                }
                self.up.set(value);
            }
        }
        Ok(())
    }

    fn observe(
        &self,
        series: HistogramSeries,
        labels: &[&str],
        value: f64,
    ) -> ExporterResult<()> {
        self.histogram_vec(series)
            .get_metric_with_label_values(labels)?
            .observe(value);
        Ok(())
    }

    fn render(&self) -> ExporterResult<String> {
        let families = self.registry.gather();
        let mut buffer = Vec::with_capacity(RENDER_BUFFER_CAP);
        TextEncoder::new().encode(&families, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| ExporterError::Metrics(prometheus::Error::Msg(e.to_string())))
    }

    fn content_type(&self) -> &'static str {
        TEXT_FORMAT
    }
}
