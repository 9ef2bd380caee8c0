//! Minimal markdown handling for entry descriptions.
//!
//! Descriptions are typed in a markdown editor. The PDF gets plain text, the
//! HTML preview gets escaped text with line breaks kept.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FORMATTING: Regex = Regex::new(r"[#*_~`]").unwrap();
    static ref LINK: Regex = Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap();
    static ref NEWLINE_RUN: Regex = Regex::new(r"\n+").unwrap();
}

/// Strips markdown syntax: formatting characters go, `[text](url)` keeps
/// `text`, runs of newlines collapse to one.
pub fn to_plain_text(markdown: &str) -> String {
    let text = markdown.replace("\r\n", "\n");
    let text = FORMATTING.replace_all(&text, "");
    let text = LINK.replace_all(&text, "$1");
    let text = NEWLINE_RUN.replace_all(&text, "\n");
    text.trim().to_string()
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped HTML with each newline turned into `<br/>`.
pub fn to_html(markdown: &str) -> String {
    escape_html(markdown.replace("\r\n", "\n").trim()).replace('\n', "<br/>")
}
