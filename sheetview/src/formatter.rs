//! Output formatters for rendered documents

use anyhow::Result;
use colored::*;
use sheetview_core::format::{RED_CLASS, escape_html};
use sheetview_core::{DocumentModel, RenderedRow, SheetModel};
use std::fmt::Write;
use std::path::Path;

/// Print a per-sheet summary with colors
pub fn print_human(file_path: &Path, model: &DocumentModel) {
    println!("{}", format!("Rendered: {}", file_path.display()).bold());
    println!();

    if model.sheets.is_empty() {
        println!("{}", "No sheets rendered".yellow().bold());
        return;
    }

    for sheet in &model.sheets {
        println!("{} {}", "Sheet:".bold(), sheet.name.cyan().bold());
        println!("  {} rows, {} columns", sheet.rows.len(), sheet.max_cols);
        let warnings = sheet.warning_count();
        if warnings > 0 {
            println!("  {} {}", "Warnings:".yellow().bold(), warnings);
        }
        println!();
    }
}

/// Plain-text version of the summary, for writing to a file
pub fn render_summary(model: &DocumentModel) -> String {
    let mut out = format!("Rendered: {}\n", model.file_name);
    for sheet in &model.sheets {
        let _ = writeln!(
            out,
            "{}: {} rows, {} columns, {} warnings",
            sheet.name,
            sheet.rows.len(),
            sheet.max_cols,
            sheet.warning_count()
        );
    }
    out
}

pub fn render_json(model: &DocumentModel) -> Result<String> {
    Ok(serde_json::to_string_pretty(model)?)
}

/// Standalone HTML page with one table per sheet
pub fn render_html(model: &DocumentModel) -> String {
    let title = escape_html(&model.file_name);
    let mut out = String::new();

    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html>\n<head>\n<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>{}</title>", title);
    let _ = writeln!(
        out,
        "<style>\ntable {{ border-collapse: collapse; margin-bottom: 2em; }}\n\
         td {{ border: 1px solid #999; padding: 4px 8px; vertical-align: top; }}\n\
         td.warning {{ background: #fff3cd; text-align: center; }}\n\
         .{} {{ color: red; }}\n</style>",
        RED_CLASS
    );
    let _ = writeln!(out, "</head>\n<body>\n<h1>{}</h1>", title);

    for sheet in &model.sheets {
        write_sheet(&mut out, sheet);
    }

    let _ = writeln!(out, "</body>\n</html>");
    out
}

fn write_sheet(out: &mut String, sheet: &SheetModel) {
    let _ = writeln!(out, "<h2>{}</h2>\n<table>", escape_html(&sheet.name));
    for row in &sheet.rows {
        match row {
            RenderedRow::Warning { html } => {
                let _ = writeln!(
                    out,
                    "<tr><td class=\"warning\" colspan=\"{}\">{}</td></tr>",
                    sheet.max_cols.max(1),
                    html
                );
            }
            RenderedRow::Data { cells } => {
                out.push_str("<tr>");
                for cell in cells {
                    out.push_str("<td");
                    if cell.rowspan > 1 {
                        let _ = write!(out, " rowspan=\"{}\"", cell.rowspan);
                    }
                    if cell.colspan > 1 {
                        let _ = write!(out, " colspan=\"{}\"", cell.colspan);
                    }
                    let _ = write!(out, ">{}</td>", cell.html);
                }
                out.push_str("</tr>\n");
            }
        }
    }
    out.push_str("</table>\n");
}
