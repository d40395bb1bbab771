use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sheetview_core::{RenderConfig, Renderer};
use std::fs;
use std::path::PathBuf;

mod formatter;

#[derive(Parser)]
#[command(name = "sheetview")]
#[command(about = "Render checklist workbooks as layout-preserving HTML tables", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the XLSX workbook (defaults to the configured workbook)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Render the last (Note) column as well
    #[arg(long)]
    keep_note_column: bool,

    /// Fail on rows with more than one warning merge
    #[arg(long)]
    strict: bool,

    /// Leave hidden sheets out
    #[arg(long)]
    skip_hidden: bool,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored summary
    Human,
    /// JSON document model
    Json,
    /// Standalone HTML page
    Html,
}

fn load_config(cli: &Cli) -> Result<RenderConfig> {
    let mut config = if let Some(config_path) = &cli.config {
        RenderConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        let default_config_path = PathBuf::from("sheetview.toml");
        if default_config_path.exists() {
            RenderConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            RenderConfig::default()
        }
    };

    if cli.keep_note_column {
        config.global.exclude_note_column = false;
        for sheet in config.sheets.values_mut() {
            sheet.exclude_note_column = None;
        }
    }
    if cli.strict {
        config.global.strict_warning_rows = true;
    }
    if cli.skip_hidden {
        config.global.skip_hidden_sheets = true;
    }
    if let Some(file) = &cli.file {
        config.workbook = file.clone();
    }

    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let workbook = config.workbook.clone();
    log::debug!("Rendering {}", workbook.display());

    let renderer = Renderer::with_config(config);
    let model = renderer
        .render_file(&workbook)
        .with_context(|| format!("Failed to render workbook: {}", workbook.display()))?;

    let output = match cli.format {
        OutputFormat::Human => {
            if cli.output.is_none() {
                formatter::print_human(&workbook, &model);
                return Ok(());
            }
            formatter::render_summary(&model)
        }
        OutputFormat::Json => formatter::render_json(&model)?,
        OutputFormat::Html => formatter::render_html(&model),
    };

    match &cli.output {
        Some(path) => fs::write(path, output)
            .with_context(|| format!("Failed to write output to {}", path.display()))?,
        None => println!("{}", output),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const CONFIG: &str = r#"
workbook = "data/Flight.xlsx"

[sheets."Walkaround"]
exclude_note_column = true
"#;

    fn parse(args: &[&str]) -> Cli {
        let argv = std::iter::once("sheetview").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap()
    }

    fn write_config(dir: &Path) -> String {
        let path = dir.join("render.toml");
        fs::write(&path, CONFIG).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_config_file_without_flags() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write_config(dir.path());

        let cli = parse(&["--config", config_path.as_str()]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.workbook, PathBuf::from("data/Flight.xlsx"));
        assert!(config.exclude_note_column_for("Walkaround"));
        assert!(!config.global.strict_warning_rows);
        assert!(!config.global.skip_hidden_sheets);
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write_config(dir.path());
        let args = [
            "Other.xlsx",
            "--config",
            config_path.as_str(),
            "--keep-note-column",
            "--strict",
            "--skip-hidden",
        ];

        let config = load_config(&parse(&args)).unwrap();
        assert_eq!(config.workbook, PathBuf::from("Other.xlsx"));
        assert!(config.global.strict_warning_rows);
        assert!(config.global.skip_hidden_sheets);
        // Per-sheet settings lose to the flag as well
        assert!(!config.global.exclude_note_column);
        assert!(!config.exclude_note_column_for("Walkaround"));
        assert!(!config.exclude_note_column_for("Cabin"));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let missing = missing.to_string_lossy().into_owned();
        let cli = parse(&["--config", missing.as_str()]);

        let err = load_config(&cli).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn test_output_format_values() {
        assert!(matches!(parse(&["-f", "json"]).format, OutputFormat::Json));
        assert!(matches!(parse(&[]).format, OutputFormat::Human));
        let unknown = Cli::try_parse_from(["sheetview", "--format", "pdf"]);
        assert!(unknown.is_err());
    }
}
