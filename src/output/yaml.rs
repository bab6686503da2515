use serde_json::Value;

use super::{FormatOptions, OutputFormatter};

pub struct YamlFormatter;

impl OutputFormatter for YamlFormatter {
    fn format(value: &Value, _options: &FormatOptions) -> String {
        serde_yaml::to_string(value).unwrap_or_else(|_| "[]".to_string())
    }
}
