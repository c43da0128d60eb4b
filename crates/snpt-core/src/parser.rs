//! Default document parser and content-type policy.
//!
//! [`TextParser`] handles plain text and HTML: HTML is reduced to text by
//! dropping script/style blocks, stripping tags, and decoding entities,
//! then both paths split the text into sentences on terminal punctuation
//! and line breaks. Deployments with richer formats substitute their own
//! [`DocumentParser`](crate::DocumentParser) behind the trait.

use crate::provider::{ContentTypePolicy, DocumentParser, ParsedDocument};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "text", "md", "html", "htm", "xhtml"];
const SUPPORTED_MIME_TYPES: &[&str] = &[
    "text/plain",
    "text/markdown",
    "text/html",
    "application/xhtml+xml",
];

#[allow(clippy::expect_used)]
static SCRIPT_BLOCKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").expect("static pattern")
});

#[allow(clippy::expect_used)]
static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("static pattern"));

#[allow(clippy::expect_used)]
static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("static pattern"));

/// Fixed allowlists of parseable extensions and MIME types.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardContentPolicy;

impl ContentTypePolicy for StandardContentPolicy {
    fn is_supported_extension(&self, ext: &str) -> bool {
        SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
    }

    fn is_supported_mime_type(&self, mime: &str) -> bool {
        let bare = mime.split(';').next().unwrap_or(mime).trim();
        SUPPORTED_MIME_TYPES.contains(&bare.to_ascii_lowercase().as_str())
    }
}

/// Parser for plain-text and HTML documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextParser;

impl DocumentParser for TextParser {
    fn parse(&self, _url: &Url, content_type: &str, bytes: &[u8]) -> Result<ParsedDocument> {
        let bare = content_type.split(';').next().unwrap_or(content_type).trim();
        let text = String::from_utf8_lossy(bytes);

        let plain = match bare.to_ascii_lowercase().as_str() {
            "text/html" | "application/xhtml+xml" => strip_html(&text),
            "text/plain" | "text/markdown" => text.into_owned(),
            other => {
                return Err(Error::ParserFailed(format!(
                    "unsupported content type '{other}'"
                )));
            },
        };

        Ok(ParsedDocument::new(split_sentences(&plain)))
    }
}

/// Reduces an HTML document to its text content.
fn strip_html(html: &str) -> String {
    let without_blocks = SCRIPT_BLOCKS.replace_all(html, " ");
    let without_tags = TAGS.replace_all(&without_blocks, " ");
    let decoded = html_escape::decode_html_entities(without_tags.as_ref()).into_owned();
    SPACE_RUNS.replace_all(&decoded, " ").into_owned()
}

/// Splits text into sentences on terminal punctuation and line breaks.
fn split_sentences(text: &str) -> Vec<String> {
    text.split(['.', '!', '?', '\n', '\r'])
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .map(str::to_string)
        .collect()
}
