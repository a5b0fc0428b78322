/// Derives the test file path for a source file.
///
/// `src/Services/Foo.cs` becomes `tests/Services/FooTests.cs`: the `src`
/// directory segment is swapped for `tests` and the stem gets a `Tests` suffix.
/// Both `/` and `\` separators are understood regardless of the host platform.
/// Returns `None` when there is no usable source path.
pub fn test_file_path(source_path: Option<&str>) -> Option<String> {
    let source_path = source_path.map(str::trim).filter(|p| !p.is_empty())?;

    let split = source_path.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let (directory, file_name) = source_path.split_at(split);
    if file_name.is_empty() {
        return None;
    }

    let test_name = match file_name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}Tests{}", &file_name[..dot], &file_name[dot..]),
        _ => format!("{file_name}Tests"),
    };

    Some(format!("{}{test_name}", swap_src_segment(directory)))
}

fn swap_src_segment(directory: &str) -> String {
    let directory = match directory.strip_prefix("src") {
        Some(rest) if rest.starts_with(['/', '\\']) => format!("tests{rest}"),
        _ => directory.to_string(),
    };
    directory
        .replace("/src/", "/tests/")
        .replace("\\src\\", "\\tests\\")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_src_directory_swapped() {
        assert_eq!(
            test_file_path(Some("/repo/src/Services/OrderService.cs")).as_deref(),
            Some("/repo/tests/Services/OrderServiceTests.cs")
        );
    }

    #[test]
    fn test_relative_src_prefix_swapped() {
        assert_eq!(
            test_file_path(Some("src/Foo.cs")).as_deref(),
            Some("tests/FooTests.cs")
        );
    }

    #[test]
    fn test_windows_src_directory_swapped() {
        assert_eq!(
            test_file_path(Some("C:\\repo\\src\\Foo.cs")).as_deref(),
            Some("C:\\repo\\tests\\FooTests.cs")
        );
    }

    #[test]
    fn test_path_without_src_keeps_directory() {
        assert_eq!(
            test_file_path(Some("app/Foo.cs")).as_deref(),
            Some("app/FooTests.cs")
        );
        assert_eq!(test_file_path(Some("Foo.txt")).as_deref(), Some("FooTests.txt"));
    }

    #[test]
    fn test_path_without_extension() {
        assert_eq!(test_file_path(Some("Makefile")).as_deref(), Some("MakefileTests"));
    }

    #[test]
    fn test_missing_path() {
        assert_eq!(test_file_path(None), None);
        assert_eq!(test_file_path(Some("   ")), None);
    }
}
