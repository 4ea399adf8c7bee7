/// Split a whitespace-delimited field the way target definitions do
/// (spec.md §4.1): break on tab, newline or space, and drop empty tokens.
///
/// `sources("a.cpp  b.cpp")` and `uses("foo\nbar")` both go through this.
pub fn split_whitespace_list(value: &str) -> Vec<String> {
    value
        .split(['\t', '\n', ' '])
        .filter(|tok| !tok.is_empty())
        .map(str::to_string)
        .collect()
}

/// Apply [`split_whitespace_list`] to every entry in `values` and
/// concatenate the results, preserving order. Used when a target has
/// collected several raw `sources`/`uses`/`export_include` strings (one per
/// call to the fluent builder) and they all need flattening into one list.
pub fn split_all<'a>(values: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut out = Vec::new();
    for value in values {
        out.extend(split_whitespace_list(value));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_tab_newline_and_space() {
        assert_eq!(
            split_whitespace_list("a.cpp\tb.cpp\nc.cpp d.cpp"),
            vec!["a.cpp", "b.cpp", "c.cpp", "d.cpp"]
        );
    }

    #[test]
    fn skips_empty_tokens() {
        assert_eq!(split_whitespace_list("  a.cpp   b.cpp  "), vec!["a.cpp", "b.cpp"]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(split_whitespace_list("   ").is_empty());
    }

    #[test]
    fn split_all_flattens_in_order() {
        let values = vec!["a.cpp b.cpp".to_string(), "c.cpp".to_string()];
        assert_eq!(split_all(&values), vec!["a.cpp", "b.cpp", "c.cpp"]);
    }
}
