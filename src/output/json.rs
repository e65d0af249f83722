use serde_json::json;

use super::{ChannelSummary, DesignReport, Formatter, iso8601_timestamp};

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_design(&self, report: &DesignReport) -> String {
        let mut value = json!(report);
        value["ts"] = json!(iso8601_timestamp());
        value.to_string()
    }

    fn format_channel(&self, summary: &ChannelSummary) -> String {
        json!(summary).to_string()
    }
}
