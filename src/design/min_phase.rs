use num_complex::Complex64;
use rustfft::FftPlanner;

use super::coefficients::FilterCoefficients;

/// Convert a linear-phase FIR filter to minimum phase
///
/// Homomorphic reconstruction through the real cepstrum: the log magnitude
/// spectrum is transformed to the cepstral domain, folded onto its causal
/// half, and exponentiated back. The result has the same length and
/// magnitude response (plus the floor) as the input, with its energy pulled
/// towards the first taps.
///
/// # Arguments
/// * `coefficients` - Linear-phase taps
/// * `floor_db` - Spectral floor `10^(-floor_db/10)` added before the log so
///   spectral nulls stay finite. Larger values mean a smaller floor, and a
///   floor that is too small lets the log amplify noise in null bins.
pub fn to_minimum_phase(coefficients: &FilterCoefficients, floor_db: f64) -> FilterCoefficients {
    let n = coefficients.num_taps();
    if n == 0 {
        return FilterCoefficients::passthrough();
    }

    let floor = 10f64.powf(-floor_db / 10.0);
    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(n);
    let inverse = planner.plan_fft_inverse(n);
    let norm = 1.0 / n as f64;

    let mut buf: Vec<Complex64> = coefficients
        .iter()
        .map(|&b| Complex64::new(b, 0.0))
        .collect();
    forward.process(&mut buf);

    for bin in buf.iter_mut() {
        *bin = Complex64::new((bin.norm() + floor).ln(), 0.0);
    }
    inverse.process(&mut buf);

    // Real cepstrum folded onto its causal half
    for (i, bin) in buf.iter_mut().enumerate() {
        *bin = Complex64::new(bin.re * norm * causal_fold_weight(i, n), 0.0);
    }

    forward.process(&mut buf);
    for bin in buf.iter_mut() {
        *bin = bin.exp();
    }
    inverse.process(&mut buf);

    let taps = buf.iter().map(|c| c.re * norm).collect();
    FilterCoefficients::new(taps)
}

/// Weight applied to cepstral index `i` of an `n`-point cepstrum
///
/// 1 at the origin and at the exact midpoint of even lengths, 2 on the
/// causal half, 0 on the anti-causal half.
fn causal_fold_weight(i: usize, n: usize) -> f64 {
    if i == 0 || (n.is_multiple_of(2) && i == n / 2) {
        1.0
    } else if i < n.div_ceil(2) {
        2.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal_processing::response::{energy_centroid, magnitude_response};
    use approx::assert_relative_eq;

    fn fold(n: usize) -> Vec<f64> {
        (0..n).map(|i| causal_fold_weight(i, n)).collect()
    }

    #[test]
    fn test_fold_weights() {
        assert_eq!(fold(1), vec![1.0]);
        assert_eq!(fold(2), vec![1.0, 1.0]);
        assert_eq!(fold(5), vec![1.0, 2.0, 2.0, 0.0, 0.0]);
        assert_eq!(fold(6), vec![1.0, 2.0, 2.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_empty_input() {
        let out = to_minimum_phase(&FilterCoefficients::passthrough(), 20.0);
        assert!(out.is_passthrough());
    }

    #[test]
    fn test_preserves_length_and_magnitude() {
        // Symmetric smoothing kernel: linear phase with a delay of 3 samples
        let taps = FilterCoefficients::new(vec![0.05, 0.1, 0.2, 0.3, 0.2, 0.1, 0.05]);
        let floor_db = 60.0;
        let min_phase = to_minimum_phase(&taps, floor_db);
        assert_eq!(min_phase.num_taps(), taps.num_taps());

        let n = taps.num_taps();
        let before = magnitude_response(&taps, n);
        let after = magnitude_response(&min_phase, n);
        let floor = 10f64.powf(-floor_db / 10.0);
        for (a, b) in before.iter().zip(after.iter()) {
            assert_relative_eq!(b, &(a + floor), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_reduces_delay_of_lowpass() {
        let order = 100;
        let window = crate::design::kaiser::kaiser_samples(order + 1, 5.0);
        let linear = crate::design::freq_sampling::design_from_response(
            order,
            &[0.0, 0.2, 0.3, 1.0],
            &[1.0, 1.0, 0.0, 0.0],
            &window,
        )
        .unwrap();
        let min_phase = to_minimum_phase(&linear, 40.0);

        assert_relative_eq!(energy_centroid(&linear), 50.0, epsilon = 1e-6);
        assert!(energy_centroid(&min_phase) < 25.0);
        // DC gain survives the reconstruction
        assert_relative_eq!(min_phase.dc_gain(), linear.dc_gain() + 1e-4, epsilon = 1e-9);
    }
}
