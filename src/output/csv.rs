use super::{ChannelSummary, DesignReport, Formatter};

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format_design(&self, report: &DesignReport) -> String {
        let mut out = String::from("index,tap");
        for (i, tap) in report.taps.iter().enumerate() {
            out.push_str(&format!("\n{},{:.12e}", i, tap));
        }
        out
    }

    fn format_channel(&self, s: &ChannelSummary) -> String {
        format!(
            "{},{},{:.6},{:.6},{:.6},{:.6}",
            s.channel, s.count, s.mean, s.std_dev, s.min, s.max
        )
    }

    fn channel_header(&self) -> Option<&'static str> {
        Some("channel,count,mean,std_dev,min,max")
    }
}
