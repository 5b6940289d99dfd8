use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pmx_core::{render, Bundle, HealthAnalyzer};

#[derive(Parser)]
#[command(name = "pmx-health")]
#[command(version)]
#[command(about = "Analyze Proxmox health check data collected from a host", long_about = None)]
struct Cli {
    /// JSON file produced by the data collector
    input_file: String,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output_file: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Full report as pretty-printed JSON
    Json,
    /// Short plain-text digest
    Summary,
    /// Markdown document with embedded evidence
    Markdown,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let raw = std::fs::read_to_string(&cli.input_file)
        .with_context(|| format!("failed to read input file '{}'", cli.input_file))?;
    let bundle: Bundle = serde_json::from_str(&raw)
        .with_context(|| format!("invalid JSON in input file '{}'", cli.input_file))?;

    let report = HealthAnalyzer::new(bundle).analyze();

    let output = match cli.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Summary => render::render_summary(&report),
        OutputFormat::Markdown => render::render_markdown(&report),
    };

    if let Some(path) = cli.output_file {
        std::fs::write(&path, &output)
            .with_context(|| format!("failed to write report to '{}'", path))?;
        eprintln!("Analysis report saved to: {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}
