//! Display-side post-processing of a filtered window
//!
//! These run on a snapshot of the display buffer, never on the streaming
//! filter's own input, so they do not disturb the filter state.

use crate::config::PostProcessConfig;
use crate::constants::MIN_STD_THRESHOLD;

/// Apply the enabled steps in order: common average, standardize, zero mean
pub fn apply(channels: &mut [Vec<f32>], config: &PostProcessConfig) {
    if config.common_average {
        common_average(channels);
    }
    if config.standardize {
        standardize(channels);
    }
    if config.zero_mean {
        zero_mean(channels);
    }
}

/// Subtract the across-channel mean from every sample (common average reference)
pub fn common_average(channels: &mut [Vec<f32>]) {
    let Some(len) = channels.first().map(Vec::len) else {
        return;
    };
    let count = channels.len() as f32;
    for n in 0..len {
        let mean = channels.iter().map(|c| c[n]).sum::<f32>() / count;
        for ch in channels.iter_mut() {
            ch[n] -= mean;
        }
    }
}

/// Scale each channel by the inverse of its sample standard deviation
///
/// The mean is not removed. Channels with fewer than two samples or no
/// variation are left unchanged.
pub fn standardize(channels: &mut [Vec<f32>]) {
    for ch in channels.iter_mut() {
        if ch.len() < 2 {
            continue;
        }
        let std = sample_std(ch);
        if std > MIN_STD_THRESHOLD {
            for x in ch.iter_mut() {
                *x /= std;
            }
        }
    }
}

/// Remove each channel's mean
pub fn zero_mean(channels: &mut [Vec<f32>]) {
    for ch in channels.iter_mut() {
        if ch.is_empty() {
            continue;
        }
        let mean = mean(ch);
        for x in ch.iter_mut() {
            *x -= mean;
        }
    }
}

fn mean(samples: &[f32]) -> f32 {
    samples.iter().sum::<f32>() / samples.len() as f32
}

fn sample_std(samples: &[f32]) -> f32 {
    let mean = mean(samples);
    let var = samples.iter().map(|x| (x - mean) * (x - mean)).sum::<f32>()
        / (samples.len() - 1) as f32;
    var.sqrt()
}
