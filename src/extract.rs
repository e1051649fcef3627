/// Page text extraction (content script side) and validation (popup side)

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::error::SummarizeError;

/// Longest text ever sent to the summarizer, in characters
pub const MAX_PAGE_TEXT_CHARS: usize = 10_000;

/// Shortest page worth summarizing, in characters after trimming
pub const MIN_PAGE_TEXT_CHARS: usize = 100;

const STRIPPED_SELECTORS: &str = "script, style, nav, header, footer, aside";

/// Keep at most `max_chars` characters, never splitting a code point
pub fn truncate_text(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Truncate and trim raw page text, rejecting pages with too little content
pub fn prepare_page_text(raw: &str) -> Result<String, SummarizeError> {
    let text = truncate_text(raw, MAX_PAGE_TEXT_CHARS).trim();
    if text.chars().count() < MIN_PAGE_TEXT_CHARS {
        return Err(SummarizeError::InsufficientContent);
    }
    Ok(text.to_string())
}

/// Pick the main content container: `<article>`, else `<main>`, else `<body>`
fn content_root(document: &Document) -> Option<Element> {
    ["article", "main"]
        .iter()
        .find_map(|selector| document.query_selector(selector).ok().flatten())
        .or_else(|| document.body().map(Element::from))
}

/// Visible text of the page's main content, without navigation chrome.
///
/// Works on a deep clone so the live page is left untouched.
pub fn extract_page_content(document: &Document) -> Option<String> {
    let root = content_root(document)?;
    let clone: Element = root.clone_node_with_deep(true).ok()?.dyn_into().ok()?;

    if let Ok(nodes) = clone.query_selector_all(STRIPPED_SELECTORS) {
        for i in 0..nodes.length() {
            if let Some(element) = nodes.item(i).and_then(|node| node.dyn_into::<Element>().ok()) {
                element.remove();
            }
        }
    }

    let text = clone
        .dyn_ref::<HtmlElement>()
        .map(|element| element.inner_text())
        .filter(|text| !text.is_empty())
        .or_else(|| clone.text_content())
        .unwrap_or_default();

    Some(truncate_text(&text, MAX_PAGE_TEXT_CHARS).trim().to_string())
}
