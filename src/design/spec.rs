use crate::config::FilterConfig;
use crate::constants::MAX_FILTER_TAPS;
use crate::error::{FilterError, Result};

/// Band-pass design request
#[derive(Debug, Clone, PartialEq)]
pub struct BandPassSpec {
    /// Stop/pass/pass/stop band edges in Hz, ascending
    pub edges_hz: [f64; 4],
    /// Nominal stream sample rate in Hz
    pub sample_rate_hz: f64,
    /// Stopband attenuation target in dB
    pub attenuation_db: f64,
    /// Reconstruct the filter as minimum phase
    pub minimum_phase: bool,
}

/// What the user asked the stream to be filtered with
///
/// Resolved once from the raw parameter list entered in the configuration
/// dialog; the design code never inspects parameter counts itself.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    /// Kaiser-windowed frequency-sampling band-pass
    BandPass(BandPassSpec),
    /// Boxcar average over `taps` samples (non-positive means a single unity tap)
    MovingAverage { taps: i64 },
}

impl FilterSpec {
    /// Band-pass spec with the configured attenuation and phase defaults
    pub fn band_pass(edges_hz: [f64; 4], sample_rate_hz: f64, config: &FilterConfig) -> Self {
        FilterSpec::BandPass(BandPassSpec {
            edges_hz,
            sample_rate_hz,
            attenuation_db: config.attenuation_db,
            minimum_phase: config.minimum_phase,
        })
    }

    pub fn moving_average(taps: i64) -> Self {
        FilterSpec::MovingAverage { taps }
    }

    /// Resolve a raw parameter list into a spec
    ///
    /// Four values are band edges in Hz, one value is a moving-average tap
    /// count. Any other arity is rejected.
    ///
    /// # Errors
    /// Returns `FilterError::InvalidFilterSpec` for the wrong number of
    /// parameters, a non-integral tap count or one above `MAX_FILTER_TAPS`.
    pub fn from_params(params: &[f64], sample_rate_hz: f64, config: &FilterConfig) -> Result<Self> {
        match *params {
            [f1, f2, f3, f4] => Ok(Self::band_pass([f1, f2, f3, f4], sample_rate_hz, config)),
            [taps] => {
                if !taps.is_finite() || taps.fract() != 0.0 {
                    return Err(FilterError::InvalidFilterSpec(format!(
                        "moving average tap count must be an integer, got {}",
                        taps
                    )));
                }
                if taps > MAX_FILTER_TAPS as f64 {
                    return Err(FilterError::InvalidFilterSpec(format!(
                        "moving average of {} taps exceeds the {} tap limit",
                        taps, MAX_FILTER_TAPS
                    )));
                }
                Ok(Self::moving_average(taps as i64))
            }
            _ => Err(FilterError::InvalidFilterSpec(format!(
                "expected 4 band edges or 1 tap count, got {} parameters",
                params.len()
            ))),
        }
    }
}
