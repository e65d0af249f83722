use super::coefficients::FilterCoefficients;
use super::freq_sampling::design_from_response;
use super::kaiser::design_kaiser;
use super::min_phase::to_minimum_phase;
use super::spec::{BandPassSpec, FilterSpec};
use crate::constants::{MAX_FILTER_TAPS, NORMALIZED_FREQ_CEILING};
use crate::error::{FilterError, Result};

/// Target gains at `{0, e1, e2, e3, e4, 1}`: stop, stop, pass, pass, stop, stop
const BAND_PASS_TEMPLATE: [f64; 6] = [0.0, 0.0, 1.0, 1.0, 0.0, 0.0];

/// Tunables for the band-pass design pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignOptions {
    /// Upper limit for normalized band edges (1.0 = Nyquist)
    pub normalized_ceiling: f64,
    /// Spectral floor for the minimum-phase log step, in dB.
    /// `None` uses the requested attenuation target.
    pub min_phase_floor_db: Option<f64>,
}

impl Default for DesignOptions {
    fn default() -> Self {
        Self {
            normalized_ceiling: NORMALIZED_FREQ_CEILING,
            min_phase_floor_db: None,
        }
    }
}

/// Turns a [`FilterSpec`] into filter taps
///
/// Band-pass specs run Kaiser window design, frequency sampling and, when
/// requested, minimum-phase reconstruction. Each stage returns new taps.
#[derive(Debug, Clone, Default)]
pub struct FilterDesigner {
    options: DesignOptions,
}

impl FilterDesigner {
    pub fn new(options: DesignOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DesignOptions {
        &self.options
    }

    /// Design the filter described by `spec`
    ///
    /// # Errors
    /// `InvalidBandSpec` for band edges that are negative, unordered or that
    /// collapse after normalization, `DegenerateWindow` when the attenuation
    /// target yields an empty window or one longer than `MAX_FILTER_TAPS`,
    /// `InvalidFilterSpec` for a moving average above that limit.
    pub fn build(&self, spec: &FilterSpec) -> Result<FilterCoefficients> {
        match spec {
            FilterSpec::BandPass(bp) => self.band_pass(bp),
            FilterSpec::MovingAverage { taps } => moving_average(*taps),
        }
    }

    /// Design the filter, falling back to pass-through on a bad spec
    ///
    /// The error is logged; the returned taps are empty so the stream is
    /// shown unfiltered rather than not at all.
    pub fn build_or_passthrough(&self, spec: &FilterSpec) -> FilterCoefficients {
        self.build(spec).unwrap_or_else(|e| {
            log::warn!("Filter design rejected, streaming unfiltered: {}", e);
            FilterCoefficients::passthrough()
        })
    }

    /// Band edges scaled so that 1.0 is Nyquist, capped at the ceiling
    pub fn normalize_edges(&self, spec: &BandPassSpec) -> Result<[f64; 4]> {
        let fs = spec.sample_rate_hz;
        if !fs.is_finite() || fs <= 0.0 {
            return Err(FilterError::InvalidBandSpec(format!(
                "sample rate must be positive, got {}",
                fs
            )));
        }
        if let Some(bad) = spec.edges_hz.iter().find(|e| !e.is_finite() || **e < 0.0) {
            return Err(FilterError::InvalidBandSpec(format!(
                "band edge {} Hz is not a non-negative frequency",
                bad
            )));
        }

        let edges = spec
            .edges_hz
            .map(|edge| (edge * 2.0 / fs).min(self.options.normalized_ceiling));

        if edges.windows(2).any(|w| w[1] <= w[0]) {
            return Err(FilterError::InvalidBandSpec(format!(
                "band edges {:?} Hz at {} Hz must be strictly increasing after normalization (got {:?})",
                spec.edges_hz, fs, edges
            )));
        }
        Ok(edges)
    }

    fn band_pass(&self, spec: &BandPassSpec) -> Result<FilterCoefficients> {
        let edges = self.normalize_edges(spec)?;

        // Steepest transition drives the window; first pair wins ties
        let steepest = (0..3).fold(0, |best, i| {
            if edges[i + 1] - edges[i] < edges[best + 1] - edges[best] {
                i
            } else {
                best
            }
        });
        let window = design_kaiser(
            edges[steepest],
            edges[steepest + 1],
            spec.attenuation_db,
            false,
        )?;

        let breakpoints = [0.0, edges[0], edges[1], edges[2], edges[3], 1.0];
        let linear = design_from_response(
            window.order(),
            &breakpoints,
            &BAND_PASS_TEMPLATE,
            &window.samples,
        )?;

        log::debug!(
            "Band-pass {:?} Hz @ {} Hz: {} taps, beta {:.3}, minimum phase {}",
            spec.edges_hz,
            spec.sample_rate_hz,
            linear.num_taps(),
            window.beta,
            spec.minimum_phase
        );

        if spec.minimum_phase {
            let floor_db = self
                .options
                .min_phase_floor_db
                .unwrap_or(spec.attenuation_db);
            Ok(to_minimum_phase(&linear, floor_db))
        } else {
            Ok(linear)
        }
    }
}

/// Boxcar averaging taps; a non-positive count degrades to a single unity tap
///
/// # Errors
/// Returns `FilterError::InvalidFilterSpec` above `MAX_FILTER_TAPS` taps.
pub fn moving_average(taps: i64) -> Result<FilterCoefficients> {
    let len = usize::try_from(taps.max(1)).unwrap_or(usize::MAX);
    if len > MAX_FILTER_TAPS {
        return Err(FilterError::InvalidFilterSpec(format!(
            "moving average of {} taps exceeds the {} tap limit",
            taps, MAX_FILTER_TAPS
        )));
    }
    let weight = 1.0 / len as f64;
    Ok(FilterCoefficients::new(vec![weight; len]))
}
