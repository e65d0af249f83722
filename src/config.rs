//! Configuration for the bioscope stream viewer core.
//!
//! Every section has a `Default` that matches the viewer's out-of-the-box
//! behaviour, and the whole tree can be loaded from TOML:
//!
//! ```toml
//! [filter]
//! attenuation_db = 20.0
//! minimum_phase = true
//!
//! [stream]
//! display_rate_hz = 100.0
//! init_time_range_secs = 5.0
//!
//! [post_process]
//! common_average = true
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::constants::{DEFAULT_ATTENUATION_DB, NORMALIZED_FREQ_CEILING};
use crate::design::DesignOptions;
use crate::error::{FilterError, Result};

/// Raw filter parameters as typed into the configuration dialog
///
/// Whitespace-separated numbers: four band edges in Hz (`"1 2 3 4"`) for a
/// band-pass, a single tap count (`"5"`) for a moving average, or nothing
/// at all for no filtering.
///
/// # Example
/// ```
/// use bioscope::config::FilterParams;
///
/// let params: FilterParams = "1 2 30 35".parse().unwrap();
/// assert_eq!(params.values(), &[1.0, 2.0, 30.0, 35.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterParams(Vec<f64>);

impl FilterParams {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// No parameters entered: the stream is shown unfiltered
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FilterParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", parts.join(" "))
    }
}

impl FromStr for FilterParams {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let value: f64 = part
                    .parse()
                    .map_err(|_| format!("invalid filter parameter: {}", part))?;
                if !value.is_finite() {
                    return Err(format!("filter parameter must be finite: {}", part));
                }
                Ok(value)
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Filter design configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Stopband attenuation target in dB for band-pass designs
    pub attenuation_db: f64,
    /// Reconstruct band-pass filters as minimum phase (lower latency)
    pub minimum_phase: bool,
    /// Ceiling for normalized band edges (1.0 = Nyquist)
    pub normalized_ceiling: f64,
    /// Spectral floor for minimum-phase reconstruction in dB.
    /// Defaults to the attenuation target when unset.
    pub min_phase_floor_db: Option<f64>,
}

impl FilterConfig {
    pub fn design_options(&self) -> DesignOptions {
        DesignOptions {
            normalized_ceiling: self.normalized_ceiling,
            min_phase_floor_db: self.min_phase_floor_db,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            attenuation_db: DEFAULT_ATTENUATION_DB,
            minimum_phase: true,
            normalized_ceiling: NORMALIZED_FREQ_CEILING,
            min_phase_floor_db: None,
        }
    }
}

/// Stream buffering and display configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Sample rate assumed when the stream reports no nominal rate (irregular streams).
    /// Also the rate the display is decimated to.
    pub display_rate_hz: f64,
    /// Plot refresh rate in Hz
    pub refresh_rate_hz: f64,
    /// Longest time window the display buffer can hold, in seconds
    pub max_time_range_secs: f64,
    /// Time window shown initially, in seconds
    pub init_time_range_secs: f64,
    /// First displayed channel (1-based)
    pub channel_min: usize,
    /// Last displayed channel (1-based, clamped to the stream's channel count)
    pub channel_max: usize,
    /// Samples per chunk when reading from files
    pub chunk_size: usize,
}

impl StreamConfig {
    /// Rate used for buffering: the nominal rate when the stream has one
    pub fn effective_sample_rate(&self, nominal_rate_hz: f64) -> f64 {
        if nominal_rate_hz > 0.0 {
            nominal_rate_hz
        } else {
            self.display_rate_hz
        }
    }

    /// Zero-based displayed channel range for a stream with `channel_count` channels
    pub fn channel_range(&self, channel_count: usize) -> std::ops::Range<usize> {
        let start = self.channel_min.max(1) - 1;
        let end = self.channel_max.min(channel_count);
        start.min(end)..end
    }

    /// Period of the data polling timer
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.display_rate_hz.max(f64::EPSILON))
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            display_rate_hz: 100.0,
            refresh_rate_hz: 30.0,
            max_time_range_secs: 30.0,
            init_time_range_secs: 5.0,
            channel_min: 1,
            channel_max: 64,
            chunk_size: 32,
        }
    }
}

/// Post-processing applied to the displayed window
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostProcessConfig {
    /// Subtract the across-channel mean from every sample
    pub common_average: bool,
    /// Scale each channel by the inverse of its standard deviation
    pub standardize: bool,
    /// Remove each channel's mean
    pub zero_mean: bool,
}

impl PostProcessConfig {
    pub fn any(&self) -> bool {
        self.common_average || self.standardize || self.zero_mean
    }
}

/// Top-level viewer configuration
///
/// # Example
/// ```
/// use bioscope::config::ViewerConfig;
///
/// let config = ViewerConfig::from_toml_str("[filter]\nattenuation_db = 40.0\n").unwrap();
/// assert_eq!(config.filter.attenuation_db, 40.0);
/// assert!(config.filter.minimum_phase);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Filter design configuration
    pub filter: FilterConfig,
    /// Stream buffering configuration
    pub stream: StreamConfig,
    /// Display post-processing configuration
    pub post_process: PostProcessConfig,
}

impl ViewerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| FilterError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            FilterError::Config(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.stream.display_rate_hz > 0.0) {
            return Err(FilterError::Config(format!(
                "display_rate_hz must be positive, got {}",
                self.stream.display_rate_hz
            )));
        }
        if !(self.stream.max_time_range_secs >= 0.0) || !(self.stream.init_time_range_secs >= 0.0)
        {
            return Err(FilterError::Config("time ranges must be non-negative".to_string()));
        }
        if self.stream.channel_min == 0 || self.stream.channel_max < self.stream.channel_min {
            return Err(FilterError::Config(format!(
                "invalid channel range {}..={}",
                self.stream.channel_min, self.stream.channel_max
            )));
        }
        if self.stream.chunk_size == 0 {
            return Err(FilterError::Config("chunk_size must be at least 1".to_string()));
        }
        if !(self.filter.normalized_ceiling > 0.0 && self.filter.normalized_ceiling <= 1.0) {
            return Err(FilterError::Config(format!(
                "normalized_ceiling must be in (0, 1], got {}",
                self.filter.normalized_ceiling
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_params_band_pass() {
        let params: FilterParams = "1 2 3 4".parse().unwrap();
        assert_eq!(params.values(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_filter_params_extra_whitespace_and_commas() {
        let params: FilterParams = "  0.5,  1\t40 45 ".parse().unwrap();
        assert_eq!(params.values(), &[0.5, 1.0, 40.0, 45.0]);
    }

    #[test]
    fn test_filter_params_empty() {
        let params: FilterParams = "".parse().unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_filter_params_invalid() {
        assert!("1 two 3 4".parse::<FilterParams>().is_err());
        assert!("inf".parse::<FilterParams>().is_err());
    }

    #[test]
    fn test_filter_params_display() {
        let params = FilterParams::new(vec![1.0, 2.5]);
        assert_eq!(params.to_string(), "1 2.5");
    }

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.filter.attenuation_db, 20.0);
        assert!(config.filter.minimum_phase);
        assert!(!config.post_process.any());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_partial_sections() {
        let config = ViewerConfig::from_toml_str(
            r#"
            [filter]
            minimum_phase = false
            min_phase_floor_db = 60.0

            [stream]
            channel_max = 8

            [post_process]
            zero_mean = true
            "#,
        )
        .unwrap();
        assert!(!config.filter.minimum_phase);
        assert_eq!(config.filter.min_phase_floor_db, Some(60.0));
        assert_eq!(config.filter.design_options().min_phase_floor_db, Some(60.0));
        assert_eq!(config.stream.channel_max, 8);
        assert_eq!(config.stream.channel_min, 1);
        assert!(config.post_process.zero_mean);
    }

    #[test]
    fn test_toml_rejects_bad_values() {
        assert!(ViewerConfig::from_toml_str("[stream]\nchannel_min = 0\n").is_err());
        assert!(ViewerConfig::from_toml_str("[stream]\ndisplay_rate_hz = 0.0\n").is_err());
        assert!(ViewerConfig::from_toml_str("[filter]\nattenuation_db = \"loud\"\n").is_err());
    }

    #[test]
    fn test_effective_sample_rate() {
        let stream = StreamConfig::default();
        assert_eq!(stream.effective_sample_rate(250.0), 250.0);
        assert_eq!(stream.effective_sample_rate(0.0), stream.display_rate_hz);
    }

    #[test]
    fn test_channel_range_clamped() {
        let stream = StreamConfig {
            channel_min: 2,
            channel_max: 64,
            ..Default::default()
        };
        assert_eq!(stream.channel_range(8), 1..8);
        assert_eq!(stream.channel_range(1), 1..1);
    }
}
