//! Core library for codeagent
//!
//! This crate implements the **Functional Core** of the codeagent application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`codeagent_core`** (this crate): Pure transformation functions with zero I/O
//! - **`codeagent`**: Model gateways, orchestration, file reads and the CLI, HTTP
//!   and MCP surfaces (the Imperative Shell)
//!
//! Everything here is deterministic: the same request always yields the same
//! prompt, the same analysis and the same extracted block. The shell decides
//! which of the two pipelines runs (live models or the heuristic fallback) and
//! performs the only side effects: HTTP calls and reading the file a change
//! summary is computed against.
//!
//! # Module Organization
//!
//! - [`agent`]: Request/response model, instruction classification, prompt
//!   assembly, action-verb detection and test path derivation
//! - [`analysis`]: Lexical heuristic analyzer and the demo-mode replies built on it
//! - [`credentials`]: Placeholder credential detection
//! - [`extract`]: Linear scanner for fenced code blocks
//! - [`summary`]: Text of the one-line change summary
//!
//! # Example Usage
//!
//! ```rust
//! use codeagent_core::analysis::{analyze, CodeKind};
//! use codeagent_core::extract::{first_fenced_block, wrap_in_fence};
//!
//! let analysis = analyze("public class OrdersController : ControllerBase {}");
//! assert_eq!(analysis.detected_kind, CodeKind::Controller);
//!
//! let text = format!("Here it is:\n{}", wrap_in_fence("class Foo {}"));
//! assert_eq!(first_fenced_block(&text).unwrap().trimmed(), "class Foo {}");
//! ```

pub mod agent;
pub mod analysis;
pub mod credentials;
pub mod extract;
pub mod summary;
