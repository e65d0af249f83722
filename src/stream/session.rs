use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::{FilterParams, PostProcessConfig, StreamConfig, ViewerConfig};
use crate::design::{FilterCoefficients, FilterDesigner, FilterSpec};
use crate::error::Result;
use crate::signal_processing::{StreamingFilterApplier, post_process};
use crate::stream::{DisplayBuffer, SampleChunk};

/// One stream being filtered and buffered for display
///
/// Owns the designed filter, the per-channel filter state and the write side
/// of the display buffer. Plotting code reads through a [`DisplayHandle`],
/// which may live on another thread.
pub struct StreamSession {
    designer: FilterDesigner,
    config: ViewerConfig,
    sample_rate: f64,
    spec: Option<FilterSpec>,
    applier: StreamingFilterApplier,
    display: Arc<Mutex<DisplayBuffer>>,
}

impl StreamSession {
    /// Start a session from the filter parameters typed by the user
    ///
    /// No parameters means no filtering. A `nominal_rate_hz` of zero or less
    /// marks an irregular stream; the configured display rate stands in for it.
    ///
    /// # Errors
    /// Returns the design error when the parameters cannot be turned into a
    /// filter; nothing is streamed in that case.
    pub fn new(
        config: &ViewerConfig,
        num_channels: usize,
        nominal_rate_hz: f64,
        params: &FilterParams,
    ) -> Result<Self> {
        let sample_rate = config.stream.effective_sample_rate(nominal_rate_hz);
        let spec = spec_from_params(params, sample_rate, config)?;
        Self::with_spec(config, num_channels, nominal_rate_hz, spec)
    }

    /// Start a session with an already resolved filter spec
    pub fn with_spec(
        config: &ViewerConfig,
        num_channels: usize,
        nominal_rate_hz: f64,
        spec: Option<FilterSpec>,
    ) -> Result<Self> {
        let designer = FilterDesigner::new(config.filter.design_options());
        let coefficients = design(&designer, spec.as_ref())?;
        let sample_rate = config.stream.effective_sample_rate(nominal_rate_hz);

        let display = DisplayBuffer::with_time_range(
            num_channels,
            sample_rate,
            config
                .stream
                .max_time_range_secs
                .max(config.stream.init_time_range_secs),
        );

        log::info!(
            "Stream session: {} channels @ {} Hz, {} taps, display buffer {} samples",
            num_channels,
            sample_rate,
            coefficients.num_taps(),
            display.capacity()
        );

        Ok(Self {
            designer,
            config: config.clone(),
            sample_rate,
            spec,
            applier: StreamingFilterApplier::new(coefficients, num_channels),
            display: Arc::new(Mutex::new(display)),
        })
    }

    /// Filter a chunk and publish it to the display buffer
    ///
    /// All channels of the chunk become visible to readers at once.
    pub fn push_chunk(&mut self, chunk: &SampleChunk) -> Result<SampleChunk> {
        let filtered = self.applier.apply(chunk)?;
        if !filtered.is_empty() {
            lock(&self.display).push(&filtered)?;
        }
        Ok(filtered)
    }

    /// Replace the filter with a newly designed one
    ///
    /// Coefficients and state are swapped together; on a design error the
    /// running filter is kept and the error returned.
    pub fn reconfigure(&mut self, spec: Option<FilterSpec>) -> Result<()> {
        let coefficients = design(&self.designer, spec.as_ref())?;
        log::info!(
            "Filter reconfigured: {:?} ({} taps)",
            spec,
            coefficients.num_taps()
        );
        self.applier.replace_coefficients(coefficients);
        self.spec = spec;
        Ok(())
    }

    /// Reconfigure from raw dialog parameters
    pub fn reconfigure_params(&mut self, params: &FilterParams) -> Result<()> {
        let spec = spec_from_params(params, self.sample_rate, &self.config)?;
        self.reconfigure(spec)
    }

    pub fn display_handle(&self) -> DisplayHandle {
        DisplayHandle {
            buffer: Arc::clone(&self.display),
            stream: self.config.stream.clone(),
            post_process: self.config.post_process.clone(),
            sample_rate: self.sample_rate,
        }
    }

    pub fn coefficients(&self) -> &FilterCoefficients {
        self.applier.coefficients()
    }

    pub fn spec(&self) -> Option<&FilterSpec> {
        self.spec.as_ref()
    }

    /// Sample rate used for design and buffering
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn num_channels(&self) -> usize {
        self.applier.num_channels()
    }
}

/// Read side of a session's display buffer
#[derive(Clone)]
pub struct DisplayHandle {
    buffer: Arc<Mutex<DisplayBuffer>>,
    stream: StreamConfig,
    post_process: PostProcessConfig,
    sample_rate: f64,
}

/// Window of filtered data ready for plotting
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplaySnapshot {
    /// Displayed channels, oldest sample first
    pub channels: Vec<Vec<f32>>,
    /// Time of each displayed sample in seconds
    pub time: Vec<f64>,
    /// Samples written to the buffer when the snapshot was taken
    pub total_samples: u64,
}

impl DisplayHandle {
    /// Copy out the newest `duration_secs` of data
    ///
    /// Applies the displayed channel range, decimation to the display rate
    /// and post-processing. The time axis ends at the newest timestamp, or
    /// at the sample count divided by the rate for untimestamped streams.
    pub fn snapshot(&self, duration_secs: f64) -> DisplaySnapshot {
        let requested = (self.sample_rate * duration_secs).round().max(0.0) as usize;
        let step = ((self.sample_rate / self.stream.display_rate_hz) as usize).max(1);

        let (mut channels, available, total_samples, last_timestamp) = {
            let buffer = lock(&self.buffer);
            let count = requested.min(buffer.len());
            let range = self.stream.channel_range(buffer.num_channels());
            let mut data = buffer.latest(count, step);
            data.truncate(range.end);
            data.drain(..range.start);
            (data, count, buffer.total_written(), buffer.last_timestamp())
        };

        if self.post_process.any() {
            post_process::apply(&mut channels, &self.post_process);
        }

        let points = channels.first().map_or(0, Vec::len);
        let t_max = last_timestamp.unwrap_or(total_samples as f64 / self.sample_rate);
        let t_min = t_max - available.saturating_sub(1) as f64 / self.sample_rate;
        let time = linspace(t_min, t_max, points);

        DisplaySnapshot {
            channels,
            time,
            total_samples,
        }
    }

    /// Snapshot over the configured initial time range
    pub fn default_snapshot(&self) -> DisplaySnapshot {
        self.snapshot(self.stream.init_time_range_secs)
    }
}

fn spec_from_params(
    params: &FilterParams,
    sample_rate: f64,
    config: &ViewerConfig,
) -> Result<Option<FilterSpec>> {
    if params.is_empty() {
        return Ok(None);
    }
    FilterSpec::from_params(params.values(), sample_rate, &config.filter).map(Some)
}

fn design(designer: &FilterDesigner, spec: Option<&FilterSpec>) -> Result<FilterCoefficients> {
    match spec {
        Some(spec) => designer.build(spec),
        None => Ok(FilterCoefficients::passthrough()),
    }
}

fn lock(buffer: &Mutex<DisplayBuffer>) -> MutexGuard<'_, DisplayBuffer> {
    // A panicked writer leaves whole chunks behind, so the data is still usable
    buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![end],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            (0..points).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;

    fn config() -> ViewerConfig {
        let mut config = ViewerConfig::default();
        config.stream.display_rate_hz = 250.0;
        config
    }

    #[test]
    fn test_empty_params_means_no_filter() {
        let session = StreamSession::new(&config(), 2, 250.0, &FilterParams::default()).unwrap();
        assert!(session.spec().is_none());
        assert!(session.coefficients().is_passthrough());
    }

    #[test]
    fn test_bad_params_rejected_up_front() {
        let params: FilterParams = "1 2".parse().unwrap();
        let result = StreamSession::new(&config(), 2, 250.0, &params);
        assert!(matches!(result, Err(FilterError::InvalidFilterSpec(_))));
    }

    #[test]
    fn test_irregular_stream_uses_display_rate() {
        let params: FilterParams = "4".parse().unwrap();
        let session = StreamSession::new(&config(), 1, 0.0, &params).unwrap();
        assert_eq!(session.sample_rate(), 250.0);
        assert_eq!(session.coefficients().num_taps(), 4);
    }

    #[test]
    fn test_reconfigure_keeps_filter_on_error() {
        let params: FilterParams = "3".parse().unwrap();
        let mut session = StreamSession::new(&config(), 1, 250.0, &params).unwrap();
        let bad: FilterParams = "4 3 2 1".parse().unwrap();
        assert!(session.reconfigure_params(&bad).is_err());
        assert_eq!(session.coefficients().num_taps(), 3);

        let good: FilterParams = "5".parse().unwrap();
        session.reconfigure_params(&good).unwrap();
        assert_eq!(session.coefficients().num_taps(), 5);
        assert_eq!(session.spec(), Some(&FilterSpec::MovingAverage { taps: 5 }));
    }

    #[test]
    fn test_snapshot_time_axis_from_timestamps() {
        let mut session =
            StreamSession::new(&config(), 1, 250.0, &FilterParams::default()).unwrap();
        let chunk = SampleChunk::from_channels(vec![vec![1.0, 2.0, 3.0]])
            .unwrap()
            .with_timestamps(vec![10.0, 10.004, 10.008])
            .unwrap();
        session.push_chunk(&chunk).unwrap();

        let snapshot = session.display_handle().snapshot(1.0);
        assert_eq!(snapshot.channels, vec![vec![1.0, 2.0, 3.0]]);
        assert_eq!(snapshot.total_samples, 3);
        assert_eq!(snapshot.time.len(), 3);
        assert!((snapshot.time[2] - 10.008).abs() < 1e-12);
        assert!((snapshot.time[0] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_linspace() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.0, 1.0, 1), vec![1.0]);
        assert_eq!(linspace(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
    }
}
