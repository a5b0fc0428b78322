//! Lexical heuristic analysis of C# / Razor source text.
//!
//! This is a keyword scanner, not a parser: it powers the demo-mode answers
//! produced when no model credentials are configured. Kind detection stops at
//! the first matching rule; the cross-cutting checks always run.

pub mod demo;

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Architectural role guessed from the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeKind {
    Controller,
    Service,
    Component,
    #[default]
    Unknown,
}

impl std::fmt::Display for CodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CodeKind::Controller => "Controller",
            CodeKind::Service => "Service",
            CodeKind::Component => "Component",
            CodeKind::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Result of [`analyze`]. Built fresh per request and never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAnalysis {
    pub detected_kind: CodeKind,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

pub const ISSUE_MISSING_ASYNC: &str =
    "Controller actions are not asynchronous: no async methods found. Use async Task<IActionResult> for I/O-bound endpoints.";

pub const ISSUE_MISSING_LOGGING: &str =
    "No logging detected: inject ILogger<T> and log failures and important operations.";

pub const ISSUE_DATA_CONTEXT_SCOPE: &str =
    "Data context is held in a static or public field or created with `new`: inject the DbContext through the constructor and keep it in a private readonly field (scoped lifetime).";

pub const ISSUE_MISSING_INTERFACE: &str =
    "Service does not implement an interface: extract one (e.g. IMyService) to enable dependency injection and mocking.";

pub const ISSUE_UNFILTERED_QUERY: &str =
    "Performance: a query materializes a whole collection without a filtering clause (Where). Filter on the database side and paginate large result sets.";

pub const ISSUE_SQL_INJECTION: &str =
    "CRITICAL security issue: SQL is built by string concatenation, which allows SQL injection. Use parameterized queries or an ORM.";

pub const SUGGESTION_UI_LIBRARY: &str =
    "Consider MudBlazor components (MudButton, MudTextField, MudTable) for a consistent, accessible UI.";

/// Generic API-design advice appended to every controller analysis.
pub const CONTROLLER_SUGGESTIONS: [&str; 4] = [
    "Validate incoming models with data annotations and check ModelState (or rely on [ApiController]).",
    "Return precise HTTP status codes (200, 201, 204, 400, 404) through ActionResult<T>.",
    "Expose DTOs instead of persistence entities in requests and responses.",
    "Centralize error handling with exception middleware or ProblemDetails responses.",
];

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern is a valid regex"))
}

fn controller_base_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"ControllerBase|\[ApiController\]|:\s*Controller\b")
}

fn implements_interface_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\bclass\s+\w+(?:<[^>]*>)?\s*:[^{]*\bI[A-Z]\w*")
}

fn static_data_context_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        r"(?m)^\s*(?:(?:public|private|protected|internal|static|readonly)\s+)*(?:static\s+(?:readonly\s+)?\w*DbContext|public\s+\w*DbContext\s+\w+\s*[;=])",
    )
}

fn new_data_context_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\bnew\s+\w*DbContext\s*\(")
}

fn materializing_call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\.(?:ToList|ToListAsync|ToArray|ToArrayAsync)\s*\(")
}

fn raw_select_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"(?i)\bselect\b[^;]*?\bfrom\b")
}

fn filter_clause_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"(?i)\.Where\s*\(|\bwhere\b")
}

fn sql_keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"(?i)\b(?:select|insert|update|delete)\b")
}

fn string_concatenation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r#""\s*\+|\+\s*""#)
}

fn class_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\bclass\s+([A-Za-z_]\w*)")
}

fn is_controller(source: &str) -> bool {
    controller_base_re().is_match(source)
}

fn is_service(source: &str) -> bool {
    source.contains("class ") && source.contains("Service")
}

fn is_component(source: &str) -> bool {
    const UI_MARKERS: &[&str] = &["@page", "@code", "@inject", "@bind", "ComponentBase", "<div"];
    UI_MARKERS.iter().any(|marker| source.contains(marker))
}

fn has_interface(source: &str) -> bool {
    source.contains("interface ") || implements_interface_re().is_match(source)
}

fn has_improper_data_context(source: &str) -> bool {
    static_data_context_re().is_match(source) || new_data_context_re().is_match(source)
}

fn has_unfiltered_query(source: &str) -> bool {
    let queries = materializing_call_re().is_match(source) || raw_select_re().is_match(source);
    queries && !filter_clause_re().is_match(source)
}

/// Whether the text both concatenates string literals and mentions SQL.
pub fn has_string_built_sql(source: &str) -> bool {
    string_concatenation_re().is_match(source) && sql_keyword_re().is_match(source)
}

/// Whether a single line concatenates strings into SQL.
pub(crate) fn line_builds_sql(line: &str) -> bool {
    has_string_built_sql(line)
}

/// Whether a line declares a static or public data-context field.
pub(crate) fn line_has_static_data_context(line: &str) -> bool {
    static_data_context_re().is_match(line)
}

/// Name of the first class declared in `source`.
pub fn primary_class_name(source: &str) -> Option<&str> {
    class_name_re()
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Analyzes `source` with lexical rules. Deterministic and side-effect free.
pub fn analyze(source: &str) -> CodeAnalysis {
    let mut analysis = CodeAnalysis::default();

    if source.trim().is_empty() {
        return analysis;
    }

    if is_controller(source) {
        analysis.detected_kind = CodeKind::Controller;

        if !source.contains("async ") {
            analysis.issues.push(ISSUE_MISSING_ASYNC.to_string());
        }
        if !source.contains("ILogger") && !source.contains("_logger") {
            analysis.issues.push(ISSUE_MISSING_LOGGING.to_string());
        }
        if has_improper_data_context(source) {
            analysis.issues.push(ISSUE_DATA_CONTEXT_SCOPE.to_string());
        }
    } else if is_service(source) {
        analysis.detected_kind = CodeKind::Service;

        if !has_interface(source) {
            analysis.issues.push(ISSUE_MISSING_INTERFACE.to_string());
        }
    } else if is_component(source) {
        analysis.detected_kind = CodeKind::Component;

        if !source.contains("<Mud") {
            analysis.suggestions.push(SUGGESTION_UI_LIBRARY.to_string());
        }
    }

    if has_unfiltered_query(source) {
        analysis.issues.push(ISSUE_UNFILTERED_QUERY.to_string());
    }

    if has_string_built_sql(source) {
        analysis.issues.push(ISSUE_SQL_INJECTION.to_string());
    }

    if analysis.detected_kind == CodeKind::Controller {
        analysis
            .suggestions
            .extend(CONTROLLER_SUGGESTIONS.iter().map(|s| s.to_string()));
    }

    analysis
}
