use super::{ChannelSummary, DesignReport, Formatter};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format_design(&self, report: &DesignReport) -> String {
        let mut out = format!(
            "Filter: {} @ {} Hz\nTaps: {}  delay: {:.1} samples ({:.1} ms)  DC gain: {:.4}",
            report.kind,
            report.sample_rate_hz,
            report.num_taps,
            report.delay_samples,
            1000.0 * report.delay_samples / report.sample_rate_hz,
            report.dc_gain
        );
        if let Some(gain) = report.passband_gain {
            out.push_str(&format!(
                "  pass-band gain: {:.4} ({:.2} dB)",
                gain,
                20.0 * gain.max(1e-12).log10()
            ));
        }
        if self.verbose {
            for (i, tap) in report.taps.iter().enumerate() {
                out.push_str(&format!("\n{:>5}: {:+.9e}", i, tap));
            }
        }
        out
    }

    fn format_channel(&self, s: &ChannelSummary) -> String {
        format!(
            "Channel {:>3}: {} samples, mean {:+.4}, std {:.4}, range [{:+.4}, {:+.4}]",
            s.channel, s.count, s.mean, s.std_dev, s.min, s.max
        )
    }
}
