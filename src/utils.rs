use regex::Regex;
use std::sync::OnceLock;

/// Turn an arbitrary title into a URL-safe slug, capped at 80 characters.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else {
            slug.push('-');
        }
    }
    while slug.contains("--") {
        slug = slug.replace("--", "-");
    }
    let slug = slug.trim_matches('-');
    let truncated: String = slug.chars().take(80).collect();
    let truncated = truncated.trim_matches('-').to_string();
    if truncated.is_empty() {
        "article".to_string()
    } else {
        truncated
    }
}

/// Whitespace-delimited word count, the measure used by the minimum-length
/// gate and the validation predicates.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn markdown_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[([^\]]+)\]\((https?://[^\)]+)\)").expect("static regex is valid")
    })
}

/// Convert markdown-style `[text](url)` links into anchor tags with
/// `rel=noopener sponsored`, leaving the rest of the text untouched.
pub fn markdown_links_to_html(text: &str) -> String {
    markdown_link_re()
        .replace_all(text, "<a href=\"$2\" target=\"_blank\" rel=\"noopener sponsored\">$1</a>")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("VS Code vs Neovim -- for Rust developers!"), "vs-code-vs-neovim-for-rust-developers");
    }

    #[test]
    fn slugify_never_returns_empty() {
        assert_eq!(slugify("!!!"), "article");
    }

    #[test]
    fn slugify_caps_length() {
        let long = "word ".repeat(50);
        assert!(slugify(&long).len() <= 80);
    }

    #[test]
    fn converts_markdown_links() {
        let text = "See [Railway](https://railway.app) for details.";
        let html = markdown_links_to_html(text);
        assert!(html.contains("<a href=\"https://railway.app\""));
        assert!(html.contains("rel=\"noopener sponsored\">Railway</a>"));
        assert!(!html.contains('['));
    }

    #[test]
    fn leaves_plain_text_alone() {
        let text = "no links here | table cell |";
        assert_eq!(markdown_links_to_html(text), text);
    }
}
