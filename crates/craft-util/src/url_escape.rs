use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Everything except unreserved filename characters gets percent-encoded,
/// including `/` — a download URL must collapse to a single path component
/// (spec.md §4.6: "Output path is `current_path / URL-escaped URL`").
const ESCAPE: &AsciiSet = &CONTROLS
    .add(b'/')
    .add(b':')
    .add(b'?')
    .add(b'#')
    .add(b'%')
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'|')
    .add(b'*');

/// Percent-encode a URL so it is safe to use as a single filename.
pub fn escape_for_filename(url: &str) -> String {
    utf8_percent_encode(url, ESCAPE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_scheme_separators_and_path() {
        let escaped = escape_for_filename("http://example.com/archives/boost.zip");
        assert!(!escaped.contains('/'));
        assert!(!escaped.contains(':'));
    }

    #[test]
    fn is_stable_for_repeated_calls() {
        let url = "https://example.org/x.tar.gz";
        assert_eq!(escape_for_filename(url), escape_for_filename(url));
    }
}
