//! FIR filter design: Kaiser window, frequency sampling, minimum phase.

pub mod coefficients;
pub mod designer;
pub mod freq_sampling;
pub mod kaiser;
pub mod min_phase;
pub mod pchip;
pub mod spec;

pub use coefficients::FilterCoefficients;
pub use designer::{DesignOptions, FilterDesigner, moving_average};
pub use kaiser::{KaiserWindow, design_kaiser};
pub use min_phase::to_minimum_phase;
pub use spec::{BandPassSpec, FilterSpec};
