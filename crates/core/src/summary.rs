//! Text of the one-line change summary attached to each file modification.
//!
//! The summary is advisory: it is never used to apply a change, so the shell
//! substitutes [`MODIFICATION_DETECTED`] whenever the old content cannot be read.

pub const NEW_FILE_CREATED: &str = "New file created";

pub const MODIFICATION_DETECTED: &str = "Modification detected";

/// Number of segments produced by splitting on `\n`.
///
/// An empty string counts as one segment and a trailing newline adds one,
/// which keeps the count stable for content written without normalisation.
pub fn line_count(content: &str) -> usize {
    content.split('\n').count()
}

/// Summary for a file that already exists with `old_content`.
pub fn modified_file_summary(old_content: &str, new_content: &str) -> String {
    format!(
        "File modified: {} lines → {} lines",
        line_count(old_content),
        line_count(new_content)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count() {
        assert_eq!(line_count(""), 1);
        assert_eq!(line_count("one"), 1);
        assert_eq!(line_count("one\ntwo"), 2);
        assert_eq!(line_count("one\ntwo\n"), 3);
        assert_eq!(line_count("a\r\nb"), 2);
    }

    #[test]
    fn test_modified_file_summary_contains_both_counts() {
        let summary = modified_file_summary("a\nb\nc", "a\nb\nc\nd\ne");
        assert_eq!(summary, "File modified: 3 lines → 5 lines");
    }
}
