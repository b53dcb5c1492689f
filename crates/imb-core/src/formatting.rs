//! Formatting utilities (report markdown → Telegram HTML).

use std::sync::OnceLock;

use regex::Regex;

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Characters with markup meaning in bot replies.
const MARKDOWN_META: &[char] = &['\\', '[', ']', '(', ')', '*', '_'];

/// Backslash-escape markup characters so external text renders literally.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_META.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Make a URL safe as a `[text](url)` target: parentheses and whitespace are percent-encoded.
pub fn escape_link_target(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            c if c.is_whitespace() => out.push_str("%20"),
            c => out.push(c),
        }
    }
    out
}

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]\n]+)\]\(([^)\n]+)\)").expect("valid regex"))
}

/// Convert the markdown subset used by bot replies to Telegram-compatible HTML.
///
/// Supported: `**bold**`, `__bold__`, `[text](url)` links and backslash escapes
/// (see [`escape_markdown`]). Everything else is escaped verbatim.
pub fn convert_markdown_to_html(input: &str) -> String {
    let (text, escaped) = extract_escapes(input);

    // Pull links out first so URLs never see emphasis processing.
    let mut links: Vec<(String, String)> = Vec::new();
    let text = link_re().replace_all(&text, |caps: &regex::Captures<'_>| {
        let idx = links.len();
        links.push((caps[1].to_string(), caps[2].to_string()));
        format!("\0LINK{idx}\0")
    });

    let mut text = escape_html(&text);

    // Line-oriented transforms (avoid cross-line emphasis bugs).
    text = text
        .split('\n')
        .map(|line| {
            let l = replace_delimited(line, "**", "<b>", "</b>");
            replace_delimited(&l, "__", "<b>", "</b>")
        })
        .collect::<Vec<_>>()
        .join("\n");

    for (i, (label, url)) in links.iter().enumerate() {
        let html = if is_http_url(url) {
            format!(
                r#"<a href="{}">{}</a>"#,
                escape_html(url),
                escape_html(label)
            )
        } else {
            // Telegram rejects anchors without an absolute URL.
            format!("{}: {}", escape_html(label), escape_html(url))
        };
        text = text.replace(&format!("\0LINK{i}\0"), &html);
    }

    for (i, c) in escaped.iter().enumerate() {
        text = text.replace(&format!("\0ESC{i}\0"), &escape_html(&c.to_string()));
    }

    text
}

/// Replace `\x` escapes of markup characters with placeholders.
fn extract_escapes(input: &str) -> (String, Vec<char>) {
    let mut out = String::with_capacity(input.len());
    let mut escaped = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if MARKDOWN_META.contains(&next) {
                    chars.next();
                    out.push_str(&format!("\0ESC{}\0", escaped.len()));
                    escaped.push(next);
                    continue;
                }
            }
        }
        out.push(c);
    }

    (out, escaped)
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("https://") || s.starts_with("http://")
}

fn replace_delimited(text: &str, delim: &str, open: &str, close: &str) -> String {
    let mut out = String::new();
    let mut i = 0usize;
    while let Some(rel) = text[i..].find(delim) {
        let start = i + rel;
        out.push_str(&text[i..start]);
        let content_start = start + delim.len();
        if let Some(end_rel) = text[content_start..].find(delim) {
            let end = content_start + end_rel;
            out.push_str(open);
            out.push_str(&text[content_start..end]);
            out.push_str(close);
            i = end + delim.len();
            continue;
        }
        out.push_str(&text[start..]);
        return out;
    }
    out.push_str(&text[i..]);
    out
}
