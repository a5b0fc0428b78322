//! Demo-mode replies built from the heuristic analysis.
//!
//! Replies have the same shape as live answers: free text that may contain a
//! single fenced code block plus the path that block should be written to.
//! The shell runs them through the same extractor as model output.

use std::sync::OnceLock;

use regex::Regex;

use super::{
    analyze, line_builds_sql, line_has_static_data_context, primary_class_name, CodeAnalysis,
    CodeKind, ISSUE_MISSING_INTERFACE,
};
use crate::agent::{test_file_path, AgentRequest, Instruction};
use crate::extract::{first_fenced_block, wrap_in_fence};

pub const DEMO_NOTICE: &str = "Demo mode: no model credentials are configured, so this answer was produced by the built-in heuristic analyzer.";

const SQL_PARAMETER_NOTE: &str =
    "// SECURITY: replace string concatenation with a parameterized query.";

/// A templated answer for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoReply {
    pub text: String,
    /// Where a fenced block in `text` should be written, if anywhere.
    pub target_path: Option<String>,
    pub analysis: CodeAnalysis,
}

fn public_method_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?m)^\s*public\s+(?:(?:virtual|override|async)\s+)*([\w<>\[\],?]+(?:\s*<[^>]*>)?)\s+(\w+)\s*\(([^)]*)\)",
        )
        .expect("static pattern is a valid regex")
    })
}

/// A public method signature found in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MethodSignature {
    return_type: String,
    name: String,
    parameters: String,
}

fn public_methods(source: &str) -> Vec<MethodSignature> {
    const NOT_RETURN_TYPES: &[&str] = &["class", "interface", "static", "record", "struct", "enum"];

    public_method_re()
        .captures_iter(source)
        .filter_map(|caps| {
            let return_type = caps.get(1)?.as_str();
            if NOT_RETURN_TYPES.contains(&return_type) {
                return None;
            }
            Some(MethodSignature {
                return_type: return_type.to_string(),
                name: caps.get(2)?.as_str().to_string(),
                parameters: caps.get(3)?.as_str().trim().to_string(),
            })
        })
        .collect()
}

/// Formats an analysis as a readable report.
pub fn render_report(analysis: &CodeAnalysis) -> String {
    let mut report = format!("Detected kind: {}\n", analysis.detected_kind);

    if analysis.issues.is_empty() {
        report.push_str("\nNo issues detected.\n");
    } else {
        report.push_str("\nIssues:\n");
        for issue in &analysis.issues {
            report.push_str(&format!("- {issue}\n"));
        }
    }

    if !analysis.suggestions.is_empty() {
        report.push_str("\nSuggestions:\n");
        for suggestion in &analysis.suggestions {
            report.push_str(&format!("- {suggestion}\n"));
        }
    }

    report
}

/// Applies the mechanical fixes the analyzer knows about.
///
/// Services without an interface get one extracted from their public
/// methods, static data-context fields become readonly, and lines that build
/// SQL by concatenation are annotated. Anything else is left untouched.
pub fn rewrite_for_refactor(source: &str, analysis: &CodeAnalysis) -> String {
    let mut lines = Vec::new();
    for line in source.trim().lines() {
        if line_builds_sql(line) {
            let indent = &line[..line.len() - line.trim_start().len()];
            lines.push(format!("{indent}{SQL_PARAMETER_NOTE}"));
        }
        if line_has_static_data_context(line) {
            lines.push(make_readonly(line));
        } else {
            lines.push(line.to_string());
        }
    }
    let mut rewritten = lines.join("\n");

    let needs_interface = analysis.detected_kind == CodeKind::Service
        && analysis.issues.iter().any(|i| i == ISSUE_MISSING_INTERFACE);
    if needs_interface {
        if let Some(class_name) = primary_class_name(source) {
            rewritten = extract_interface(&rewritten, class_name);
        }
    }

    rewritten
}

/// Turns a static field declaration into a readonly instance field.
fn make_readonly(line: &str) -> String {
    let already_readonly = line.split_whitespace().any(|word| word == "readonly");
    match (line.contains("static "), already_readonly) {
        (true, true) => line.replacen("static ", "", 1),
        (true, false) => line.replacen("static ", "readonly ", 1),
        (false, _) => line.to_string(),
    }
}

fn extract_interface(source: &str, class_name: &str) -> String {
    let interface_name = format!("I{class_name}");

    let members: String = public_methods(source)
        .iter()
        .map(|m| format!("    {} {}({});\n", m.return_type, m.name, m.parameters))
        .collect();
    let interface = format!("public interface {interface_name}\n{{\n{members}}}\n\n");

    let Ok(declaration) = Regex::new(&format!(
        r"\bclass\s+{}\b(\s*:\s*[^{{\n]*[^{{\s])?",
        regex::escape(class_name)
    )) else {
        return source.to_string();
    };

    let with_base = declaration.replacen(source, 1, |caps: &regex::Captures| match caps.get(1) {
        Some(bases) => format!("class {class_name}{}, {interface_name}", bases.as_str()),
        None => format!("class {class_name} : {interface_name}"),
    });

    format!("{interface}{with_base}")
}

fn framework_attributes(framework: &str) -> (&'static str, Option<&'static str>, &'static str) {
    match framework.to_lowercase().as_str() {
        "nunit" => ("using NUnit.Framework;", Some("[TestFixture]"), "[Test]"),
        "mstest" => (
            "using Microsoft.VisualStudio.TestTools.UnitTesting;",
            Some("[TestClass]"),
            "[TestMethod]",
        ),
        _ => ("using Xunit;", None, "[Fact]"),
    }
}

fn mocking_using(mocking: &str) -> Option<&'static str> {
    match mocking.to_lowercase().as_str() {
        "moq" => Some("using Moq;"),
        "nsubstitute" => Some("using NSubstitute;"),
        "fakeiteasy" => Some("using FakeItEasy;"),
        _ => None,
    }
}

/// Builds a test class skeleton for the first class in `source`.
pub fn test_skeleton(source: &str, framework: &str, mocking: &str) -> String {
    let class_name = primary_class_name(source).unwrap_or("Subject");
    let (framework_using, class_attribute, test_attribute) = framework_attributes(framework);

    let mut out = String::new();
    out.push_str(framework_using);
    out.push('\n');
    if let Some(using) = mocking_using(mocking) {
        out.push_str(using);
        out.push('\n');
    }
    out.push('\n');
    if let Some(attribute) = class_attribute {
        out.push_str(attribute);
        out.push('\n');
    }
    out.push_str(&format!("public class {class_name}Tests\n{{\n"));

    let methods = public_methods(source);
    if methods.is_empty() {
        out.push_str(&format!(
            "    {test_attribute}\n    public void {class_name}_CanBeCreated()\n    {{\n        \
             // Arrange\n        // Act\n        // Assert\n    }}\n"
        ));
    } else {
        let tests: Vec<String> = methods
            .iter()
            .map(|method| {
                format!(
                    "    {test_attribute}\n    public void {}_BehavesAsExpected()\n    {{\n        \
                     // Arrange\n        // Act: call {}({})\n        // Assert\n    }}\n",
                    method.name, method.name, method.parameters
                )
            })
            .collect();
        out.push_str(&tests.join("\n"));
    }

    out.push('}');
    out
}

/// Picks a type name from a free-text request, e.g. "OrderService".
fn scaffold_name(message: &str) -> Option<String> {
    message
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .find(|word| {
            let mut chars = word.chars();
            chars.next().is_some_and(|c| c.is_ascii_uppercase())
                && chars.any(|c| c.is_ascii_uppercase())
        })
        .map(str::to_string)
}

/// Builds a class scaffold matching what the message asks for.
pub fn code_scaffold(message: &str) -> String {
    let lower = message.to_lowercase();

    if lower.contains("controller") {
        let name = scaffold_name(message).unwrap_or_else(|| "GeneratedController".to_string());
        return format!(
            "[ApiController]\n[Route(\"api/[controller]\")]\npublic class {name} : ControllerBase\n{{\n    \
             private readonly ILogger<{name}> _logger;\n\n    \
             public {name}(ILogger<{name}> logger)\n    {{\n        _logger = logger;\n    }}\n\n    \
             [HttpGet]\n    public async Task<IActionResult> GetAsync()\n    {{\n        \
             _logger.LogInformation(\"GET called\");\n        return Ok(await Task.FromResult(Array.Empty<object>()));\n    }}\n}}"
        );
    }

    if lower.contains("service") {
        let name = scaffold_name(message).unwrap_or_else(|| "GeneratedService".to_string());
        return format!(
            "public interface I{name}\n{{\n    Task ExecuteAsync(CancellationToken cancellationToken = default);\n}}\n\n\
             public class {name} : I{name}\n{{\n    \
             public Task ExecuteAsync(CancellationToken cancellationToken = default)\n    {{\n        \
             return Task.CompletedTask;\n    }}\n}}"
        );
    }

    if lower.contains("component") || lower.contains("page") {
        return "@page \"/generated\"\n\n<MudPaper Class=\"pa-4\">\n    <MudText Typo=\"Typo.h5\">@Title</MudText>\n</MudPaper>\n\n\
                @code {\n    [Parameter] public string Title { get; set; } = \"Generated\";\n}"
            .to_string();
    }

    let name = scaffold_name(message).unwrap_or_else(|| "GeneratedClass".to_string());
    format!("public class {name}\n{{\n}}")
}

/// Code a demo rewrite may work on: the selection, or else the first fenced
/// block of the message. Plain prose is never treated as code.
fn code_to_rewrite(request: &AgentRequest) -> Option<&str> {
    match request.selected_code.as_deref() {
        Some(code) if !code.trim().is_empty() => Some(code),
        _ => first_fenced_block(&request.message)
            .map(|block| block.trimmed())
            .filter(|code| !code.is_empty()),
    }
}

/// Builds the demo-mode reply for a request.
pub fn demo_reply(instruction: Instruction, request: &AgentRequest) -> DemoReply {
    let code = code_to_rewrite(request);
    let source = code.unwrap_or_else(|| request.source_text());
    let analysis = analyze(source);
    let report = render_report(&analysis);
    let has_code = code.is_some();

    let (text, target_path) = match instruction {
        Instruction::AnalyzeCode => (
            format!("{}:\n\n{report}", instruction.heading()),
            None,
        ),
        Instruction::Refactor if has_code => {
            let rewritten = rewrite_for_refactor(source, &analysis);
            (
                format!(
                    "{}:\n\n{report}\nRefactored code:\n\n{}\n",
                    instruction.heading(),
                    wrap_in_fence(&rewritten)
                ),
                request.target_path().map(str::to_string),
            )
        }
        Instruction::GenerateTests if has_code => {
            let framework = request.test_framework();
            let skeleton = test_skeleton(source, framework, request.mocking_framework());
            (
                format!(
                    "{}: {framework} skeleton covering the public surface.\n\n{}\n",
                    instruction.heading(),
                    wrap_in_fence(&skeleton)
                ),
                test_file_path(request.target_path()),
            )
        }
        Instruction::Refactor | Instruction::GenerateTests => (
            format!(
                "{}: no code was provided, so there is nothing to work on. Select some code and try again.",
                instruction.heading()
            ),
            None,
        ),
        Instruction::GenerateCode => (
            format!(
                "{}: scaffold for \"{}\".\n\n{}\n",
                instruction.heading(),
                request.message.trim(),
                wrap_in_fence(&code_scaffold(&request.message))
            ),
            request.target_path().map(str::to_string),
        ),
        Instruction::General => {
            let mut text = format!(
                "Request received: \"{}\".\nThe language models are not configured, so only the built-in analyzer is available.",
                request.message.trim()
            );
            if request
                .selected_code
                .as_deref()
                .is_some_and(|code| !code.trim().is_empty())
            {
                text.push_str(&format!("\n\nSelected code:\n\n{report}"));
            }
            (text, None)
        }
    };

    DemoReply {
        text,
        target_path,
        analysis,
    }
}
