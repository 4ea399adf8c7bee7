//! Parsing of compiler-emitted dependency lists (spec.md §4.3).

use std::path::{Path, PathBuf};

/// Parse a GCC/Clang `-MM` Makefile rule (`target: dep dep \` continuation
/// lines) into the dependency paths, resolved against `cwd` if relative.
/// The first whitespace-separated token is the rule's target and is
/// skipped.
pub fn parse_make_rule(output: &str, cwd: &Path) -> Vec<PathBuf> {
    let joined = output.replace("\\\r\n", " ").replace("\\\n", " ");
    let mut tokens = joined.split_whitespace();
    // First token is `<object>:` (colon may be glued to it or stand alone);
    // it names the rule's own target, not a dependency, so it's dropped.
    if tokens.next().is_none() {
        return Vec::new();
    }
    let mut paths = Vec::new();
    for token in tokens {
        let token = token.trim_end_matches(':');
        if token.is_empty() {
            continue;
        }
        paths.push(resolve(token, cwd));
    }
    paths
}

/// Parse MSVC `/showIncludes` output (`Note: including file:   <path>`
/// lines interleaved with the normal compile output) into the included
/// paths, in the order reported.
pub fn parse_show_includes(output: &str) -> Vec<PathBuf> {
    const MARKER: &str = "Note: including file:";
    output
        .lines()
        .filter_map(|line| line.find(MARKER).map(|at| line[at + MARKER.len()..].trim()))
        .map(PathBuf::from)
        .collect()
}

fn resolve(token: &str, cwd: &Path) -> PathBuf {
    let path = Path::new(token);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_make_rule() {
        let rule = "main.o: main.cpp util.h other.h\n";
        let deps = parse_make_rule(rule, Path::new("/proj"));
        assert_eq!(
            deps,
            vec![
                PathBuf::from("/proj/main.cpp"),
                PathBuf::from("/proj/util.h"),
                PathBuf::from("/proj/other.h"),
            ]
        );
    }

    #[test]
    fn parses_continuation_lines() {
        let rule = "main.o: main.cpp \\\n  util.h \\\n  other.h\n";
        let deps = parse_make_rule(rule, Path::new("/proj"));
        assert_eq!(deps.len(), 3);
    }

    #[test]
    fn absolute_dependency_paths_are_kept_as_is() {
        let rule = "main.o: /usr/include/stdio.h\n";
        let deps = parse_make_rule(rule, Path::new("/proj"));
        assert_eq!(deps, vec![PathBuf::from("/usr/include/stdio.h")]);
    }

    #[test]
    fn parses_show_includes_lines() {
        let output = "main.cpp\nNote: including file:   C:\\inc\\util.h\nNote: including file:  C:\\inc\\other.h\n";
        let deps = parse_show_includes(output);
        assert_eq!(deps, vec![PathBuf::from("C:\\inc\\util.h"), PathBuf::from("C:\\inc\\other.h")]);
    }
}
