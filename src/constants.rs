//! Numeric constants for filter design stability
//!
//! These constants define the fixed points of the frequency-sampling design
//! and the thresholds used to keep it numerically well behaved.

/// Smallest FFT length used for frequency-sampling design.
/// Short filters still get a dense enough grid for the interpolated response.
pub const MIN_DESIGN_FFT_LEN: usize = 512;

/// Ceiling applied to normalized band edges (1.0 = Nyquist).
/// Edges closer to Nyquist than this make the design ill-conditioned.
pub const NORMALIZED_FREQ_CEILING: f64 = 0.95;

/// Default stopband attenuation target in dB for band-pass designs.
pub const DEFAULT_ATTENUATION_DB: f64 = 20.0;

/// Attenuation below which the Kaiser window degenerates to rectangular.
pub const KAISER_RECTANGULAR_LIMIT_DB: f64 = 21.0;

/// Attenuation above which the high-attenuation beta formula is used.
pub const KAISER_HIGH_ATTENUATION_DB: f64 = 50.0;

/// Relative term size at which the I0 power series is truncated.
pub const BESSEL_SERIES_EPSILON: f64 = 1e-16;

/// Longest filter accepted from a design request, in taps.
/// Larger requests are rejected before any taps are allocated.
pub const MAX_FILTER_TAPS: usize = 1 << 20;

/// Capacity floor for the filtered display buffer, in samples.
pub const MIN_DISPLAY_BUFFER_SAMPLES: usize = 100;

/// Standard deviation below which a channel is treated as constant.
pub const MIN_STD_THRESHOLD: f32 = 1e-12;
