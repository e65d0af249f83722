mod csv;
mod json;
mod text;

use chrono::Utc;
use serde::Serialize;

use crate::design::{FilterCoefficients, FilterSpec};
use crate::signal_processing::{energy_centroid, gain_at};

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Summary of a designed filter
#[derive(Debug, Clone, Serialize)]
pub struct DesignReport {
    pub kind: String,
    pub sample_rate_hz: f64,
    pub num_taps: usize,
    /// Energy centroid of the impulse response, in samples
    pub delay_samples: f64,
    pub dc_gain: f64,
    /// Gain at the middle of the pass band (band-pass only)
    pub passband_gain: Option<f64>,
    pub taps: Vec<f64>,
}

impl DesignReport {
    pub fn new(spec: Option<&FilterSpec>, coefficients: &FilterCoefficients, sample_rate_hz: f64) -> Self {
        let (kind, passband_gain) = match spec {
            Some(FilterSpec::BandPass(bp)) => {
                let centre = 0.5 * (bp.edges_hz[1] + bp.edges_hz[2]);
                let phase = if bp.minimum_phase { "minimum" } else { "linear" };
                (
                    format!(
                        "band-pass {}-{} Hz ({} phase, {} dB)",
                        bp.edges_hz[1], bp.edges_hz[2], phase, bp.attenuation_db
                    ),
                    Some(gain_at(coefficients, centre, sample_rate_hz)),
                )
            }
            Some(FilterSpec::MovingAverage { taps }) => {
                (format!("moving average ({} taps requested)", taps), None)
            }
            None => ("pass-through".to_string(), None),
        };

        Self {
            kind,
            sample_rate_hz,
            num_taps: coefficients.num_taps(),
            delay_samples: energy_centroid(coefficients),
            dc_gain: coefficients.dc_gain(),
            passband_gain,
            taps: coefficients.taps().to_vec(),
        }
    }
}

/// Running statistics of one filtered channel
#[derive(Debug, Clone, Serialize)]
pub struct ChannelSummary {
    pub channel: usize,
    pub count: usize,
    pub mean: f32,
    pub std_dev: f32,
    pub min: f32,
    pub max: f32,
}

pub trait Formatter: Send {
    fn format_design(&self, report: &DesignReport) -> String;

    fn format_channel(&self, summary: &ChannelSummary) -> String;

    fn channel_header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::moving_average;

    #[test]
    fn test_report_for_moving_average() {
        let spec = FilterSpec::moving_average(4);
        let report = DesignReport::new(Some(&spec), &moving_average(4).unwrap(), 100.0);
        assert_eq!(report.num_taps, 4);
        assert!((report.dc_gain - 1.0).abs() < 1e-12);
        assert!((report.delay_samples - 1.5).abs() < 1e-12);
        assert!(report.passband_gain.is_none());
    }

    #[test]
    fn test_formatters_mention_tap_count() {
        let report = DesignReport::new(None, &FilterCoefficients::passthrough(), 250.0);
        for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Csv] {
            let text = create_formatter(format, true).format_design(&report);
            assert!(!text.is_empty());
        }
        let json = JsonFormatter.format_design(&report);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["num_taps"], 0);
        assert_eq!(value["kind"], "pass-through");
    }
}
