//! Frequency-domain inspection of FIR taps

use std::f64::consts::PI;

use num_complex::Complex64;
use rustfft::FftPlanner;

/// Magnitude response of `taps` on an `nfft`-point grid
///
/// Returns bins `0..=nfft/2`, bin `k` being `k / (nfft/2)` of Nyquist. The
/// grid is widened to the tap count if `nfft` is shorter.
pub fn magnitude_response(taps: &[f64], nfft: usize) -> Vec<f64> {
    let nfft = nfft.max(taps.len()).max(1);
    let mut buf: Vec<Complex64> = taps.iter().map(|&t| Complex64::new(t, 0.0)).collect();
    buf.resize(nfft, Complex64::new(0.0, 0.0));

    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(nfft).process(&mut buf);

    buf.iter().take(nfft / 2 + 1).map(|c| c.norm()).collect()
}

/// Magnitude response in dB, floored at -240 dB
pub fn magnitude_response_db(taps: &[f64], nfft: usize) -> Vec<f64> {
    magnitude_response(taps, nfft)
        .into_iter()
        .map(|m| 20.0 * m.max(1e-12).log10())
        .collect()
}

/// Gain of `taps` at a single frequency
pub fn gain_at(taps: &[f64], freq_hz: f64, sample_rate_hz: f64) -> f64 {
    let omega = 2.0 * PI * freq_hz / sample_rate_hz;
    taps.iter()
        .enumerate()
        .map(|(k, &t)| Complex64::from_polar(t, -omega * k as f64))
        .sum::<Complex64>()
        .norm()
}

/// Energy centroid of the impulse response in samples
///
/// `sum(k * h[k]^2) / sum(h[k]^2)`: half the order for linear-phase taps,
/// smaller when energy sits in the first taps. Zero for empty or all-zero taps.
pub fn energy_centroid(taps: &[f64]) -> f64 {
    let energy: f64 = taps.iter().map(|t| t * t).sum();
    if energy == 0.0 {
        return 0.0;
    }
    taps.iter()
        .enumerate()
        .map(|(k, t)| k as f64 * t * t)
        .sum::<f64>()
        / energy
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_boxcar_response() {
        let taps = [0.25; 4];
        let response = magnitude_response(&taps, 8);
        assert_eq!(response.len(), 5);
        assert_relative_eq!(response[0], 1.0, epsilon = 1e-12);
        // Boxcar of 4 has a null at a quarter of the sample rate
        assert_relative_eq!(response[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gain_at_matches_fft_bin() {
        let taps = [0.1, 0.4, 0.4, 0.1];
        let response = magnitude_response(&taps, 16);
        // Bin 3 of 16 at fs = 16 Hz is 3 Hz
        assert_relative_eq!(gain_at(&taps, 3.0, 16.0), response[3], epsilon = 1e-12);
    }

    #[test]
    fn test_grid_widened_for_long_filters() {
        let taps = vec![0.01; 100];
        assert_eq!(magnitude_response(&taps, 16).len(), 51);
    }

    #[test]
    fn test_energy_centroid() {
        assert_relative_eq!(energy_centroid(&[1.0, 0.0, 0.0]), 0.0);
        assert_relative_eq!(energy_centroid(&[1.0, 2.0, 1.0]), 1.0);
        assert_eq!(energy_centroid(&[]), 0.0);
    }

    #[test]
    fn test_db_floor() {
        let db = magnitude_response_db(&[0.0, 0.0], 4);
        assert!(db.iter().all(|&v| (v + 240.0).abs() < 1e-9));
    }
}
