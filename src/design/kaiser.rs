use std::f64::consts::PI;

use crate::constants::{
    BESSEL_SERIES_EPSILON, KAISER_HIGH_ATTENUATION_DB, KAISER_RECTANGULAR_LIMIT_DB,
    MAX_FILTER_TAPS,
};
use crate::error::{FilterError, Result};

/// Kaiser window sized for a given transition band and attenuation
///
/// The window length doubles as the FIR length of the frequency-sampling
/// design, so `samples.len()` is the tap count of the resulting filter.
#[derive(Debug, Clone, PartialEq)]
pub struct KaiserWindow {
    /// Shape parameter (0 = rectangular)
    pub beta: f64,
    /// Window samples, symmetric about the midpoint
    pub samples: Vec<f64>,
}

impl KaiserWindow {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Filter order (`len - 1`) matching this window
    pub fn order(&self) -> usize {
        self.samples.len().saturating_sub(1)
    }
}

/// Kaiser shape parameter for a stopband attenuation in dB
pub fn kaiser_beta(attenuation_db: f64) -> f64 {
    if attenuation_db < KAISER_RECTANGULAR_LIMIT_DB {
        0.0
    } else if attenuation_db <= KAISER_HIGH_ATTENUATION_DB {
        let a = attenuation_db - KAISER_RECTANGULAR_LIMIT_DB;
        0.5842 * a.powf(0.4) + 0.07886 * a
    } else {
        0.1102 * (attenuation_db - 8.7)
    }
}

/// Kaiser window length for a normalized transition band
///
/// `low_edge` and `high_edge` are normalized frequencies (1.0 = Nyquist).
/// Halfway cases round to even.
///
/// # Errors
/// `InvalidBandSpec` if the transition width is not positive,
/// `DegenerateWindow` if the formula yields no samples or more than
/// `MAX_FILTER_TAPS`.
pub fn kaiser_length(
    low_edge: f64,
    high_edge: f64,
    attenuation_db: f64,
    force_odd: bool,
) -> Result<usize> {
    let width = high_edge - low_edge;
    if !width.is_finite() || width <= 0.0 {
        return Err(FilterError::InvalidBandSpec(format!(
            "transition band [{}, {}] has non-positive width",
            low_edge, high_edge
        )));
    }
    if !attenuation_db.is_finite() {
        return Err(FilterError::DegenerateWindow(format!(
            "attenuation {} dB is not finite",
            attenuation_db
        )));
    }

    let raw = ((attenuation_db - 7.95) / (2.0 * PI * 2.285 * width)).round_ties_even() + 1.0;
    if raw < 1.0 {
        return Err(FilterError::DegenerateWindow(format!(
            "computed length {} for attenuation {} dB and width {}",
            raw, attenuation_db, width
        )));
    }

    let mut length = raw as usize;
    if force_odd && length.is_multiple_of(2) {
        length += 1;
    }
    if length > MAX_FILTER_TAPS {
        return Err(FilterError::DegenerateWindow(format!(
            "window of {} samples for width {} exceeds the {} tap limit",
            length, width, MAX_FILTER_TAPS
        )));
    }
    Ok(length)
}

/// Design a Kaiser window for the transition band `[low_edge, high_edge]`
///
/// # Arguments
/// * `low_edge` - Lower edge of the steepest transition band (normalized)
/// * `high_edge` - Upper edge of the steepest transition band (normalized)
/// * `attenuation_db` - Stopband attenuation target in dB
/// * `force_odd` - Bump an even length to the next odd one
pub fn design_kaiser(
    low_edge: f64,
    high_edge: f64,
    attenuation_db: f64,
    force_odd: bool,
) -> Result<KaiserWindow> {
    let length = kaiser_length(low_edge, high_edge, attenuation_db, force_odd)?;
    let beta = kaiser_beta(attenuation_db);

    log::debug!(
        "Kaiser window: length={} beta={:.4} (band {:.5}-{:.5}, {} dB)",
        length,
        beta,
        low_edge,
        high_edge,
        attenuation_db
    );

    Ok(KaiserWindow {
        beta,
        samples: kaiser_samples(length, beta),
    })
}

/// Kaiser window samples of the given length and shape
pub fn kaiser_samples(length: usize, beta: f64) -> Vec<f64> {
    if length == 1 {
        return vec![1.0];
    }

    let span = (length - 1) as f64;
    let norm = bessel_i0(beta);
    (0..length)
        .map(|k| {
            // Integer numerator keeps x exactly antisymmetric about the midpoint.
            let x = (2 * k) as f64 - span;
            let x = x / span;
            bessel_i0(beta * (1.0 - x * x).max(0.0).sqrt()) / norm
        })
        .collect()
}

/// Modified Bessel function of the first kind, order zero
///
/// Power series `I0(x) = sum(((x/2)^k / k!)^2)`, truncated once the next term
/// no longer changes the sum.
pub fn bessel_i0(x: f64) -> f64 {
    let half_x_sq = (x / 2.0) * (x / 2.0);
    let mut sum = 1.0;
    let mut term = 1.0;
    let mut k = 1.0;

    loop {
        term *= half_x_sq / (k * k);
        sum += term;
        if term < BESSEL_SERIES_EPSILON * sum {
            break;
        }
        k += 1.0;
    }

    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bessel_i0_known_values() {
        assert_relative_eq!(bessel_i0(0.0), 1.0);
        assert_relative_eq!(bessel_i0(1.0), 1.2660658777520082, epsilon = 1e-12);
        assert_relative_eq!(bessel_i0(5.0), 27.239871823604442, epsilon = 1e-9);
    }

    #[test]
    fn test_beta_regimes() {
        assert_eq!(kaiser_beta(20.0), 0.0);
        assert_relative_eq!(kaiser_beta(21.0), 0.0);
        assert_relative_eq!(
            kaiser_beta(40.0),
            0.5842 * 19.0_f64.powf(0.4) + 0.07886 * 19.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(kaiser_beta(60.0), 0.1102 * 51.3, epsilon = 1e-12);
    }

    #[test]
    fn test_length_formula() {
        // (20 - 7.95) / (2pi * 2.285 * 0.008) = 104.9...
        assert_eq!(kaiser_length(0.008, 0.016, 20.0, false).unwrap(), 106);
        assert_eq!(kaiser_length(0.008, 0.016, 20.0, true).unwrap(), 107);
    }

    #[test]
    fn test_window_is_symmetric() {
        let window = design_kaiser(0.1, 0.15, 60.0, true).unwrap();
        let n = window.len();
        assert!(n % 2 == 1);
        for k in 0..n {
            assert_relative_eq!(window.samples[k], window.samples[n - 1 - k], epsilon = 1e-12);
        }
        // Peak of 1.0 at the midpoint
        assert_relative_eq!(window.samples[n / 2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_low_attenuation_is_rectangular() {
        let window = design_kaiser(0.2, 0.3, 20.0, false).unwrap();
        assert!(window.samples.iter().all(|&w| (w - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_inverted_band_rejected() {
        assert!(matches!(
            design_kaiser(0.3, 0.2, 40.0, false),
            Err(FilterError::InvalidBandSpec(_))
        ));
        assert!(matches!(
            design_kaiser(0.3, 0.3, 40.0, false),
            Err(FilterError::InvalidBandSpec(_))
        ));
    }

    #[test]
    fn test_length_limit() {
        assert!(matches!(
            kaiser_length(0.008, 0.008 + 8e-12, 20.0, false),
            Err(FilterError::DegenerateWindow(_))
        ));
        assert!(matches!(
            design_kaiser(0.1, 0.1 + 1e-9, 60.0, true),
            Err(FilterError::DegenerateWindow(_))
        ));
    }

    #[test]
    fn test_low_attenuation_target_degenerates() {
        // Below 7.95 dB the length formula goes negative
        assert!(matches!(
            design_kaiser(0.1, 0.2, 0.0, false),
            Err(FilterError::DegenerateWindow(_))
        ));
    }
}
