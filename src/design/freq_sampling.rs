use std::f64::consts::PI;

use num_complex::Complex64;
use rustfft::FftPlanner;

use super::coefficients::FilterCoefficients;
use super::pchip::MonotoneCubic;
use crate::constants::MIN_DESIGN_FFT_LEN;
use crate::error::{FilterError, Result};

/// FFT half-length used to sample the target response for a filter of `order`
pub fn design_fft_len(order: usize) -> usize {
    order.next_power_of_two().max(MIN_DESIGN_FFT_LEN)
}

/// Design a linear-phase FIR filter by frequency sampling
///
/// The target magnitude is a monotone cubic through `(breakpoints, magnitudes)`
/// sampled on an `nfft + 1` point grid covering DC to Nyquist. A delay of
/// `order / 2` samples gives the linear phase, and the impulse response is
/// truncated to `order + 1` taps and tapered by `window`.
///
/// # Arguments
/// * `order` - Filter order (tap count minus one)
/// * `breakpoints` - Normalized frequencies in [0, 1], strictly increasing
/// * `magnitudes` - Desired linear gain at each breakpoint
/// * `window` - Taper of length `order + 1`
///
/// # Errors
/// Returns `FilterError::InvalidBandSpec` if breakpoints collapse onto the
/// same grid bin, and `FilterError::DegenerateWindow` if the window length
/// does not match the order.
pub fn design_from_response(
    order: usize,
    breakpoints: &[f64],
    magnitudes: &[f64],
    window: &[f64],
) -> Result<FilterCoefficients> {
    if window.len() != order + 1 {
        return Err(FilterError::DegenerateWindow(format!(
            "window has {} samples, filter order {} needs {}",
            window.len(),
            order,
            order + 1
        )));
    }

    let nfft = design_fft_len(order);
    let grid: Vec<f64> = breakpoints
        .iter()
        .map(|&f| (f * nfft as f64).round_ties_even())
        .collect();
    let target = MonotoneCubic::new(&grid, magnitudes).map_err(|e| match e {
        FilterError::InvalidBandSpec(msg) => FilterError::InvalidBandSpec(format!(
            "band edges too close for a {}-point design grid: {}",
            nfft, msg
        )),
        other => other,
    })?;

    let delay = 0.5 * order as f64;
    let full_len = 2 * nfft;
    let mut spectrum: Vec<Complex64> = Vec::with_capacity(full_len);
    for k in 0..=nfft {
        let gain = target.evaluate(k as f64);
        let phase = -delay * PI * k as f64 / nfft as f64;
        spectrum.push(Complex64::from_polar(gain, phase));
    }
    // Negative frequencies mirror bins nfft-1..1
    for k in (1..nfft).rev() {
        let mirrored = spectrum[k].conj();
        spectrum.push(mirrored);
    }

    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_inverse(full_len).process(&mut spectrum);

    let norm = 1.0 / full_len as f64;
    let taps = spectrum
        .iter()
        .take(order + 1)
        .zip(window)
        .map(|(s, &w)| s.re * norm * w)
        .collect();

    Ok(FilterCoefficients::new(taps))
}
