mod json;
mod table;
mod yaml;

pub use json::JsonFormatter;
pub use table::TableFormatter;
pub use yaml::YamlFormatter;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    pub no_headers: bool,
}

pub trait OutputFormatter {
    fn format(value: &Value, options: &FormatOptions) -> String;
}

/// Render an operation result in the requested format
pub fn render<T: Serialize>(result: &T, format: &OutputFormat, options: &FormatOptions) -> Result<String> {
    let value = serde_json::to_value(result).context("Failed to serialize result")?;
    Ok(match format {
        OutputFormat::Json => JsonFormatter::format(&value, options),
        OutputFormat::Yaml => YamlFormatter::format(&value, options),
        OutputFormat::Table => TableFormatter::format(&value, options),
    })
}
