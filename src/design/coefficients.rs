use std::ops::Deref;

/// FIR filter taps, fixed once designed
///
/// An empty set of taps is a valid value meaning "no filtering".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCoefficients {
    taps: Vec<f64>,
}

impl FilterCoefficients {
    pub fn new(taps: Vec<f64>) -> Self {
        Self { taps }
    }

    /// Coefficients that leave the signal untouched
    pub fn passthrough() -> Self {
        Self { taps: Vec::new() }
    }

    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// Get the number of taps (filter length)
    pub fn num_taps(&self) -> usize {
        self.taps.len()
    }

    pub fn is_passthrough(&self) -> bool {
        self.taps.is_empty()
    }

    /// Samples of input history a streaming filter must retain
    pub fn history_len(&self) -> usize {
        self.taps.len().saturating_sub(1)
    }

    /// Sum of the taps (gain at DC)
    pub fn dc_gain(&self) -> f64 {
        self.taps.iter().sum()
    }

    pub fn into_taps(self) -> Vec<f64> {
        self.taps
    }
}

impl Deref for FilterCoefficients {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.taps
    }
}

impl From<Vec<f64>> for FilterCoefficients {
    fn from(taps: Vec<f64>) -> Self {
        Self::new(taps)
    }
}
