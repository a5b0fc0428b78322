use super::summary::summarize;
use codeagent_core::agent::FileModification;
use codeagent_core::extract::first_fenced_block;
use std::path::Path;

/// Turns raw model text into at most one file modification.
///
/// Only the first accepted fenced block is used. No block, or no target path,
/// yields an empty list, which callers treat as a normal outcome.
pub fn extract_modifications(raw: &str, target: Option<&str>) -> Vec<FileModification> {
    let Some(path) = target.map(str::trim).filter(|path| !path.is_empty()) else {
        return Vec::new();
    };
    let Some(block) = first_fenced_block(raw) else {
        log::debug!("no fenced block found for {path}");
        return Vec::new();
    };

    let content = block.trimmed();
    let summary = summarize(Path::new(path), content);
    vec![FileModification::update(path, content, summary)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeagent_core::agent::ModificationType;
    use codeagent_core::extract::wrap_in_fence;
    use codeagent_core::summary::NEW_FILE_CREATED;
    use tempfile::TempDir;

    #[test]
    fn test_no_fence_yields_nothing() {
        let raw = "The code looks fine, no change needed.";
        assert!(extract_modifications(raw, Some("Foo.cs")).is_empty());
        assert!(extract_modifications(raw, None).is_empty());
    }

    #[test]
    fn test_no_target_yields_nothing() {
        let raw = "```csharp\nclass A {}\n```";
        assert!(extract_modifications(raw, None).is_empty());
        assert!(extract_modifications(raw, Some("   ")).is_empty());
    }

    #[test]
    fn test_single_block_becomes_update() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("Foo.cs");
        let target = target.to_str().unwrap();
        let raw = "Here you go:\n```csharp\n\n  public class Foo {}\n\n```\nDone.";

        let modifications = extract_modifications(raw, Some(target));

        assert_eq!(modifications.len(), 1);
        let modification = &modifications[0];
        assert_eq!(modification.path, target);
        assert_eq!(modification.new_content, "public class Foo {}");
        assert_eq!(modification.modification_type, ModificationType::Update);
        assert_eq!(modification.diff_summary.as_deref(), Some(NEW_FILE_CREATED));
        assert!(modification.backup_content.is_none());
    }

    #[test]
    fn test_only_first_block_is_used() {
        let raw = "```cs\nclass First {}\n```\n\n```cs\nclass Second {}\n```";
        let modifications = extract_modifications(raw, Some("does/not/exist/First.cs"));

        assert_eq!(modifications.len(), 1);
        assert_eq!(modifications[0].new_content, "class First {}");
    }

    #[test]
    fn test_reextracting_wrapped_content_is_identity() {
        let raw = "```csharp\npublic interface IFoo\n{\n    void Run();\n}\n```";
        let first = extract_modifications(raw, Some("IFoo.cs"));
        let rewrapped = wrap_in_fence(&first[0].new_content);
        let second = extract_modifications(&rewrapped, Some("IFoo.cs"));

        assert_eq!(first[0].new_content, second[0].new_content);
    }

    #[test]
    fn test_existing_target_is_summarized() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("Bar.cs");
        std::fs::write(&target, "class Bar\n{\n}").unwrap();

        let raw = "```csharp\nclass Bar\n{\n    int x;\n}\n```";
        let modifications = extract_modifications(raw, target.to_str());

        let summary = modifications[0].diff_summary.as_deref().unwrap();
        assert!(summary.contains('3'));
        assert!(summary.contains('4'));
    }
}
