use codeagent_core::summary::{modified_file_summary, MODIFICATION_DETECTED, NEW_FILE_CREATED};
use std::io::ErrorKind;
use std::path::Path;

/// One-line description of what writing `new_content` to `path` would change.
///
/// Read failures degrade to a generic message; the summary is advisory only.
pub fn summarize(path: &Path, new_content: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(old_content) => modified_file_summary(&old_content, new_content),
        Err(err) if err.kind() == ErrorKind::NotFound => NEW_FILE_CREATED.to_string(),
        Err(err) => {
            log::debug!("could not read {} for summary: {err}", path.display());
            MODIFICATION_DETECTED.to_string()
        }
    }
}
