use crate::prelude::{eprintln, println, *};
use codeagent_core::analysis::{analyze, CodeAnalysis};
use colored::Colorize;
use std::path::PathBuf;

/// Options for the offline analyzer
#[derive(Debug, clap::Args)]
pub struct AnalyzeOptions {
    /// Source file to analyze
    pub path: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Public data function - used by both CLI and MCP
pub fn analyze_file(path: &std::path::Path) -> Result<CodeAnalysis> {
    let source = std::fs::read_to_string(path)
        .wrap_err_with(|| f!("Failed to read {}", path.display()))?;
    Ok(analyze(&source))
}

pub fn run(options: AnalyzeOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Analyzing {}", options.path.display());
    }

    let analysis = analyze_file(&options.path)?;

    if options.json {
        std::println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Detected kind:".bold().cyan(),
        analysis.detected_kind.to_string().bright_white()
    );

    if analysis.issues.is_empty() && analysis.suggestions.is_empty() {
        println!("No issues detected.");
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["Kind".bold().cyan(), "Finding".bold().cyan()]);
    for issue in &analysis.issues {
        let label = if issue.starts_with("CRITICAL") {
            "critical".red().bold()
        } else {
            "issue".yellow()
        };
        table.add_row(prettytable::row![label, issue]);
    }
    for suggestion in &analysis.suggestions {
        table.add_row(prettytable::row!["suggestion".green(), suggestion]);
    }
    table.printstd();

    Ok(())
}
