use serde_json::Value;

use super::{FormatOptions, OutputFormatter};

pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format(value: &Value, _options: &FormatOptions) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
    }
}
