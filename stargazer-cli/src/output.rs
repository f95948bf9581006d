//! Presentation adapters for a rendered [`Report`].

use colored::Colorize;
use std::fmt::{self, Write as _};

use stargazer_core::{Notice, Report, Row, Tone, render::ForecastRow};

fn cells(row: &ForecastRow) -> [&str; 7] {
    [
        &row.time,
        &row.temperature,
        &row.weather,
        row.daytime,
        &row.precipitation,
        &row.moonlight,
        row.recommendation.verdict.as_str(),
    ]
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{s}{}", " ".repeat(width.saturating_sub(len)))
}

/// Aligned plain-text table; `color` paints the recommendation cell.
/// Whether the paint reaches the output is up to `colored`'s override.
pub fn text(report: &Report, color: bool) -> Result<String, fmt::Error> {
    let table = &report.table;

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in table.forecast_rows() {
        for (w, cell) in widths.iter_mut().zip(cells(row)) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |values: &[&str]| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| pad(v, *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    writeln!(out, "Forecast for {}", report.coordinate)?;
    writeln!(out, "{}", line(&table.columns))?;

    for row in &table.rows {
        match row {
            Row::DayTitle { text } => {
                writeln!(out, "\n== {text} ==")?;
            }
            Row::Event { label, value } => {
                writeln!(out, "  {label:<9}{value}")?;
            }
            Row::Forecast(f) => {
                let values = cells(f);
                let mut rendered = line(&values[..6]);
                let verdict = values[6];
                if color {
                    let (r, g, b) = f.recommendation.tone.rgb();
                    let cell = format!(" {verdict} ").on_truecolor(r, g, b).black();
                    write!(rendered, "  {cell}")?;
                } else {
                    let marker = if f.recommendation.tone == Tone::Alert { "!" } else { "" };
                    write!(rendered, "  {verdict}{marker}")?;
                }
                writeln!(out, "{rendered}")?;
            }
        }
    }

    for notice in &report.notices {
        match notice {
            Notice::FallbackApplied { reason } => {
                writeln!(out, "\nMoonlight unknown: {reason}")?;
            }
        }
    }

    Ok(out)
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Standalone `<table>` markup with inline row and recommendation colors.
pub fn html(report: &Report) -> Result<String, fmt::Error> {
    let table = &report.table;
    let span = table.columns.len();

    let mut out = String::from("<table>\n<thead>\n<tr>");
    for col in &table.columns {
        write!(out, "<th>{}</th>", escape(col))?;
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in &table.rows {
        match row {
            Row::DayTitle { text } => {
                writeln!(
                    out,
                    "<tr class=\"title-row\"><td colspan=\"{span}\">{}</td></tr>",
                    escape(text)
                )?;
            }
            Row::Event { label, value } => {
                writeln!(
                    out,
                    "<tr class=\"sunrise-sunset-row\"><td>{}</td><td colspan=\"{}\">{}</td></tr>",
                    escape(label),
                    span - 1,
                    escape(value)
                )?;
            }
            Row::Forecast(f) => {
                write!(out, "<tr class=\"day\" style=\"background-color: {};\">", f.background)?;
                let values = cells(f);
                for value in &values[..6] {
                    write!(out, "<td>{}</td>", escape(value))?;
                }
                writeln!(
                    out,
                    "<td style=\"background-color: {};\">{}</td></tr>",
                    f.recommendation.tone.hex(),
                    escape(values[6])
                )?;
            }
        }
    }

    out.push_str("</tbody>\n</table>\n");
    Ok(out)
}

pub fn json(report: &Report) -> anyhow::Result<String> {
    let mut s = serde_json::to_string_pretty(report)?;
    s.push('\n');
    Ok(s)
}
