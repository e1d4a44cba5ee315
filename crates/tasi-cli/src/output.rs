use std::io::{self, Write};

use serde_json::{Map, Value};
use tasi_core::{DataOrigin, Envelope};

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(envelope: &Envelope<Value>, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_to(&mut out, envelope, format, pretty)?;
    out.flush()?;
    Ok(())
}

pub fn render_to(
    out: &mut impl Write,
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => render_table(out, envelope)?,
    }

    Ok(())
}

fn render_table(out: &mut impl Write, envelope: &Envelope<Value>) -> Result<(), CliError> {
    let sources = envelope
        .meta
        .source_chain
        .iter()
        .map(|origin| match origin {
            DataOrigin::Sahmk => "sahmk",
            DataOrigin::Dataset => "dataset",
        })
        .collect::<Vec<_>>()
        .join(",");
    writeln!(
        out,
        "updated {} UTC | sources {} | {}",
        envelope.meta.generated_at.format_clock(),
        sources,
        if envelope.meta.cache_hit { "cached" } else { "live" }
    )?;

    for warning in &envelope.meta.warnings {
        writeln!(out, "warning: {warning}")?;
    }
    writeln!(out)?;

    match &envelope.data {
        Value::Object(fields) => {
            for (key, value) in fields {
                render_field(out, key, value, 0)?;
            }
        }
        other => writeln!(out, "{}", scalar_text(other))?,
    }

    if !envelope.errors.is_empty() {
        writeln!(out)?;
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            writeln!(out, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}

fn render_field(out: &mut impl Write, key: &str, value: &Value, depth: usize) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    let label = key.replace('_', " ");

    match value {
        Value::Object(fields) => {
            writeln!(out, "{indent}{label}:")?;
            for (key, value) in fields {
                render_field(out, key, value, depth + 1)?;
            }
        }
        Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
            writeln!(out, "{indent}{label}:")?;
            render_rows(out, items, depth + 1)?;
        }
        Value::Array(items) if items.is_empty() => {
            writeln!(out, "{indent}{label}: (none)")?;
        }
        Value::Array(items) => {
            let joined = items.iter().map(scalar_text).collect::<Vec<_>>().join(", ");
            writeln!(out, "{indent}{label}: {joined}")?;
        }
        scalar => writeln!(out, "{indent}{label}: {}", scalar_text(scalar))?,
    }

    Ok(())
}

/// Aligned columns; the header is the union of keys in first-seen order.
fn render_rows(out: &mut impl Write, rows: &[Value], depth: usize) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    let mut columns: Vec<&str> = Vec::new();
    for row in rows.iter().filter_map(Value::as_object) {
        for key in row.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key.as_str());
            }
        }
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .filter_map(Value::as_object)
        .map(|row| columns.iter().map(|column| cell_text(row, column)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            cells
                .iter()
                .map(|row| row[index].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| pad(column, *width))
        .collect();
    writeln!(out, "{indent}{}", header.join("  ").trim_end())?;

    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    writeln!(out, "{indent}{}", rule.join("  "))?;

    for row in cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect();
        writeln!(out, "{indent}{}", line.join("  ").trim_end())?;
    }

    Ok(())
}

fn cell_text(row: &Map<String, Value>, column: &str) -> String {
    match row.get(column) {
        Some(Value::Object(_)) | Some(Value::Array(_)) => String::from("…"),
        Some(value) => scalar_text(value),
        None => String::from("N/A"),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::from("N/A"),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => String::from(if *flag { "yes" } else { "no" }),
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() => format!("{float:.2}"),
            _ => number.to_string(),
        },
        other => other.to_string(),
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}
