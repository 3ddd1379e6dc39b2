/// Derive a URL-safe slug from a title or name.
///
/// Lowercases, drops everything outside `[a-z0-9]`, whitespace and hyphens,
/// collapses whitespace/hyphen runs to a single hyphen and trims hyphens at
/// both ends. Slugs are fixed at creation time; later title edits never
/// re-derive them, so existing URLs stay stable.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
        // anything else is stripped without breaking a run
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn basic_titles() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("My First Post"), "my-first-post");
        assert_eq!(slugify("Web Dev"), "web-dev");
    }

    #[test]
    fn collapses_runs_and_trims_hyphens() {
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
        assert_eq!(slugify("--a---b--"), "a-b");
        assert_eq!(slugify("tabs\tand\nnewlines"), "tabs-and-newlines");
    }

    #[test]
    fn punctuation_only_degenerates_to_empty() {
        assert_eq!(slugify("  ---  "), "");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn strips_punctuation_inside_words() {
        assert_eq!(slugify("Don't Panic"), "dont-panic");
        assert_eq!(slugify("C++ & Rust: a comparison"), "c-rust-a-comparison");
        assert_eq!(slugify("100% coverage"), "100-coverage");
    }

    #[test]
    fn deterministic() {
        let title = "Some, Fairly! Complex -- Title 42";
        assert_eq!(slugify(title), slugify(title));
    }
}
