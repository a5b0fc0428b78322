use crate::config::GatewayOptions;
use crate::prelude::{eprintln, println, *};
use codeagent_core::agent::{
    AgentRequest, AgentResponse, METADATA_MOCKING_FRAMEWORK, METADATA_TEST_FRAMEWORK,
};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Options for processing a single request
#[derive(Debug, clap::Args)]
#[command(after_help = "EXAMPLES:
  # Ask a general question about the project:
  codeagent process -m \"How should I split this service?\" --context \"Blazor WASM, three tiers\"

  # Refactor a file in place (the new content is printed, not written):
  codeagent process --instruction refactor --selected-file src/OrderService.cs --file src/OrderService.cs

  # Generate NUnit tests:
  codeagent process --instruction generate-tests --selected-file src/Cart.cs --file src/Cart.cs --test-framework NUnit

  # Send a raw request body from stdin:
  cat request.json | codeagent process --request - --json

NOTES:
  - Without ANTHROPIC_API_KEY the agent answers in demo mode with the heuristic analyzer
  - Recognized instructions: analyze-code, refactor, generate-tests, generate-code
  - Anything else is handled as a general request")]
pub struct ProcessOptions {
    /// Read the whole request as JSON from a file, or `-` for stdin
    #[arg(long, conflicts_with_all = ["instruction", "message", "selected_code", "selected_file"])]
    pub request: Option<String>,

    /// Instruction (analyze-code, refactor, generate-tests, generate-code)
    #[arg(short, long, default_value = "")]
    pub instruction: String,

    /// Natural-language request
    #[arg(short, long)]
    pub message: Option<String>,

    /// Path of the file the request targets
    #[arg(short, long)]
    pub file: Option<String>,

    /// Free-form project description handed to the guidance model
    #[arg(long, env = "CODEAGENT_CONTEXT")]
    pub context: Option<String>,

    /// Code to work on
    #[arg(long, conflicts_with = "selected_file")]
    pub selected_code: Option<String>,

    /// Read the code to work on from a file
    #[arg(long)]
    pub selected_file: Option<PathBuf>,

    /// Test framework for generate-tests
    #[arg(long)]
    pub test_framework: Option<String>,

    /// Mocking framework for generate-tests
    #[arg(long)]
    pub mocking_framework: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[clap(flatten)]
    pub gateway: GatewayOptions,
}

/// Builds the request from either a JSON document or the individual flags.
pub fn build_request(options: &ProcessOptions) -> Result<AgentRequest> {
    if let Some(source) = options.request.as_deref() {
        let body = if source == "-" {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .wrap_err("Failed to read request from stdin")?;
            body
        } else {
            std::fs::read_to_string(source)
                .wrap_err_with(|| f!("Failed to read request file {source}"))?
        };
        return serde_json::from_str(&body).wrap_err("Request is not a valid AgentRequest");
    }

    let selected_code = match &options.selected_file {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .wrap_err_with(|| f!("Failed to read {}", path.display()))?,
        ),
        None => options.selected_code.clone(),
    };

    let mut metadata: HashMap<String, serde_json::Value> = HashMap::new();
    if let Some(framework) = &options.test_framework {
        metadata.insert(METADATA_TEST_FRAMEWORK.to_string(), framework.clone().into());
    }
    if let Some(framework) = &options.mocking_framework {
        metadata.insert(
            METADATA_MOCKING_FRAMEWORK.to_string(),
            framework.clone().into(),
        );
    }

    Ok(AgentRequest {
        message: options.message.clone().unwrap_or_default(),
        project_context: options.context.clone().unwrap_or_default(),
        instruction: options.instruction.clone(),
        file_path: options.file.clone(),
        selected_code,
        metadata: (!metadata.is_empty()).then_some(metadata),
    })
}

pub async fn run(options: ProcessOptions, global: crate::Global) -> Result<()> {
    let request = build_request(&options)?;
    let orchestrator = options.gateway.build_orchestrator()?;

    if global.verbose {
        eprintln!(
            "Instruction: {:?} ({})",
            request.instruction,
            if orchestrator.demo_mode() {
                "demo mode"
            } else {
                "live"
            }
        );
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let spinner = (!options.json).then(|| {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("Waiting for the agent...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        spinner
    });

    let response = orchestrator.process_cancellable(&request, &cancel).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if options.json {
        std::println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }

    match response.error_message {
        Some(message) if !response.success => Err(eyre!(message)),
        _ => Ok(()),
    }
}

fn print_response(response: &AgentResponse) {
    if !response.success {
        println!("{}", response.response_text.red().bold());
        return;
    }

    println!("{}", response.response_text);

    if let Some(suggestions) = &response.suggestions {
        println!();
        println!("{}", "Suggestions".bold().cyan());
        for suggestion in suggestions {
            println!("  - {suggestion}");
        }
    }

    if !response.modified_files.is_empty() {
        println!();
        let mut table = new_table();
        table.add_row(prettytable::row![
            "Path".bold().cyan(),
            "Type".bold().cyan(),
            "Summary".bold().cyan()
        ]);
        for modification in &response.modified_files {
            table.add_row(prettytable::row![
                modification.path.bright_white(),
                modification.modification_type.to_string().green(),
                modification
                    .diff_summary
                    .as_deref()
                    .unwrap_or("-")
                    .bright_black()
            ]);
        }
        table.printstd();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, clap::Parser)]
    struct TestCli {
        #[command(flatten)]
        options: ProcessOptions,
    }

    fn parse(args: &[&str]) -> ProcessOptions {
        let mut argv = vec!["codeagent"];
        argv.extend_from_slice(args);
        TestCli::parse_from(argv).options
    }

    #[test]
    fn test_build_request_from_flags() {
        let options = parse(&[
            "--instruction",
            "generate-tests",
            "--selected-code",
            "class A {}",
            "--file",
            "src/A.cs",
            "--test-framework",
            "NUnit",
        ]);

        let request = build_request(&options).unwrap();

        assert_eq!(request.instruction, "generate-tests");
        assert_eq!(request.selected_code.as_deref(), Some("class A {}"));
        assert_eq!(request.file_path.as_deref(), Some("src/A.cs"));
        assert_eq!(request.test_framework(), "NUnit");
        assert_eq!(request.mocking_framework(), "Moq");
    }

    #[test]
    fn test_build_request_without_frameworks_has_no_metadata() {
        let options = parse(&["-m", "hello"]);
        let request = build_request(&options).unwrap();

        assert_eq!(request.message, "hello");
        assert_eq!(request.instruction, "");
        assert!(request.metadata.is_none());
    }

    #[test]
    fn test_build_request_from_json_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("request.json");
        std::fs::write(
            &path,
            r#"{"message":"Refactor","instruction":"refactor","selectedCode":"class B {}","filePath":"B.cs"}"#,
        )
        .unwrap();

        let options = parse(&["--request", path.to_str().unwrap()]);
        let request = build_request(&options).unwrap();

        assert_eq!(request.instruction, "refactor");
        assert_eq!(request.file_path.as_deref(), Some("B.cs"));
        assert_eq!(request.project_context, "");
    }

    #[test]
    fn test_build_request_reads_selected_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("C.cs");
        std::fs::write(&path, "class C {}").unwrap();

        let options = parse(&["--selected-file", path.to_str().unwrap()]);
        let request = build_request(&options).unwrap();

        assert_eq!(request.selected_code.as_deref(), Some("class C {}"));
    }
}
