//! Recovery of fenced code blocks from free-form model output.
//!
//! The scanner walks the text once, left to right. An opening fence is three
//! backticks at the start of a line (indentation allowed) followed by an
//! optional language tag and a line break; the block
//! ends at the first line break immediately followed by three backticks.
//! Blocks tagged with a language outside [`LANGUAGE_ALIASES`] are skipped as a
//! whole so their closing fence is never mistaken for an opening one.

const FENCE: &str = "```";

const CLOSING_FENCE: &str = "\n```";

/// Language tags accepted on an opening fence (compared case-insensitively).
pub const LANGUAGE_ALIASES: &[&str] = &["csharp", "cs", "c#", "razor", "cshtml"];

/// Tag written by [`wrap_in_fence`].
pub const DEFAULT_LANGUAGE: &str = "csharp";

/// A code block found in a larger text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FencedBlock<'a> {
    /// Language tag as written, if any.
    pub language: Option<&'a str>,
    /// Raw text between the fences.
    pub content: &'a str,
}

impl<'a> FencedBlock<'a> {
    /// Block content without leading and trailing whitespace.
    pub fn trimmed(&self) -> &'a str {
        self.content.trim()
    }
}

/// Iterator over the accepted fenced blocks of a text.
#[derive(Debug, Clone)]
pub struct FenceScanner<'a> {
    text: &'a str,
    cursor: usize,
}

impl<'a> FenceScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, cursor: 0 }
    }
}

/// The outcome of reading an opening fence line.
enum Opening<'a> {
    /// Accepted opener; the body starts at `body_start`.
    Accepted {
        language: Option<&'a str>,
        body_start: usize,
    },
    /// Opener with an unsupported tag; the body starts at `body_start`.
    Foreign { body_start: usize },
    /// Backticks not followed by a line break.
    NotAFence,
}

impl<'a> FenceScanner<'a> {
    fn read_opening(&self, fence_start: usize) -> Opening<'a> {
        let after_fence = fence_start + FENCE.len();
        let rest = &self.text[after_fence..];
        let Some(line_end) = rest.find('\n') else {
            return Opening::NotAFence;
        };

        let body_start = after_fence + line_end + 1;
        let info = rest[..line_end].trim();
        let tag = info.split_whitespace().next();

        match tag {
            None => Opening::Accepted {
                language: None,
                body_start,
            },
            Some(tag) if is_supported_language(tag) => Opening::Accepted {
                language: Some(tag),
                body_start,
            },
            Some(tag) if tag.contains(FENCE) => Opening::NotAFence,
            Some(_) => Opening::Foreign { body_start },
        }
    }
}

impl<'a> Iterator for FenceScanner<'a> {
    type Item = FencedBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor < self.text.len() {
            let fence_start = self.cursor + self.text[self.cursor..].find(FENCE)?;

            if !starts_line(&self.text[..fence_start]) {
                self.cursor = fence_start + FENCE.len();
                continue;
            }

            match self.read_opening(fence_start) {
                Opening::NotAFence => {
                    self.cursor = fence_start + FENCE.len();
                }
                Opening::Foreign { body_start } => {
                    // Skip past the foreign block's closing fence.
                    let close = self.text[body_start..].find(CLOSING_FENCE)?;
                    self.cursor = body_start + close + CLOSING_FENCE.len();
                }
                Opening::Accepted {
                    language,
                    body_start,
                } => {
                    let close = self.text[body_start..].find(CLOSING_FENCE)?;
                    self.cursor = body_start + close + CLOSING_FENCE.len();
                    return Some(FencedBlock {
                        language,
                        content: &self.text[body_start..body_start + close],
                    });
                }
            }
        }

        None
    }
}

/// Whether the text before a fence ends at a line start, ignoring indentation.
fn starts_line(before: &str) -> bool {
    match before.trim_end_matches([' ', '\t']).chars().next_back() {
        None | Some('\n') => true,
        Some(_) => false,
    }
}

fn is_supported_language(tag: &str) -> bool {
    LANGUAGE_ALIASES
        .iter()
        .any(|alias| alias.eq_ignore_ascii_case(tag))
}

/// All accepted fenced blocks of `text`, in order.
pub fn fenced_blocks(text: &str) -> FenceScanner<'_> {
    FenceScanner::new(text)
}

/// The first accepted fenced block of `text`, if any.
pub fn first_fenced_block(text: &str) -> Option<FencedBlock<'_>> {
    fenced_blocks(text).next()
}

/// Wraps `content` in a fence the scanner accepts.
pub fn wrap_in_fence(content: &str) -> String {
    format!("{FENCE}{DEFAULT_LANGUAGE}\n{content}\n{FENCE}")
}
