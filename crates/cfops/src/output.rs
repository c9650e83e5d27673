//! Rendering of command results for `--output`.
//!
//! JSON and YAML serialize the core model types as they are. `table` and
//! `plain` go through per-command projections: a `Tabled` row type for
//! lists, a one-line summary for single results, and an id extractor for
//! scripting.

use std::io::{self, Write};

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => Ok(Table::new(data.iter().map(to_row))
            .with(Style::rounded())
            .to_string()),
        OutputFormat::Plain => Ok(data.iter().map(id_fn).collect::<Vec<_>>().join("\n")),
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            serialize(format, data)
        }
    }
}

/// Single results have no table; `summary` is the human form.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    summary: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => Ok(summary(data)),
        OutputFormat::Plain => Ok(id_fn(data)),
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            serialize(format, data)
        }
    }
}

fn serialize<T: Serialize + ?Sized>(format: &OutputFormat, data: &T) -> Result<String, CliError> {
    let rendered = match format {
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(|e| e.to_string()),
        OutputFormat::Yaml => serde_yaml::to_string(data)
            .map(|yaml| yaml.trim_end().to_owned())
            .map_err(|e| e.to_string()),
        OutputFormat::Json | OutputFormat::Table | OutputFormat::Plain => {
            serde_json::to_string_pretty(data).map_err(|e| e.to_string())
        }
    };
    rendered.map_err(|reason| CliError::Validation {
        field: "output".into(),
        reason,
    })
}

/// Result data goes to stdout. Broken pipes (`cfops ... | head`) are ignored.
pub fn print_output(output: &str, quiet: bool) {
    if !quiet && !output.is_empty() {
        let _ = writeln!(io::stdout().lock(), "{output}");
    }
}

/// Progress and confirmation messages go to stderr.
pub fn print_status(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}

pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}
