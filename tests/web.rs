//! Browser tests for DOM text extraction. Run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use page_summarizer::extract::{MAX_PAGE_TEXT_CHARS, extract_page_content};
use wasm_bindgen_test::*;
use web_sys::Document;

wasm_bindgen_test_configure!(run_in_browser);

/// Fresh document so the test runner's own page is left alone
fn document_with(body: &str) -> Document {
    let page = web_sys::window().unwrap().document().unwrap();
    let document = page
        .implementation()
        .unwrap()
        .create_html_document_with_title("test")
        .unwrap();
    document.body().unwrap().set_inner_html(body);
    document
}

#[wasm_bindgen_test]
fn prefers_article_over_body() {
    let document = document_with("<p>Outside</p><article><p>Inside the article</p></article>");

    let text = extract_page_content(&document).unwrap();

    assert!(text.contains("Inside the article"));
    assert!(!text.contains("Outside"));
}

#[wasm_bindgen_test]
fn falls_back_to_main() {
    let document = document_with("<nav>Menu</nav><main><p>Main content</p></main>");

    let text = extract_page_content(&document).unwrap();

    assert_eq!(text, "Main content");
}

#[wasm_bindgen_test]
fn strips_page_chrome() {
    let document = document_with(
        "<header>Site</header><nav>Links</nav><p>Body text</p><aside>Ads</aside>\
         <script>var x = 1;</script><style>p {}</style><footer>Copyright</footer>",
    );

    let text = extract_page_content(&document).unwrap();

    assert_eq!(text, "Body text");
}

#[wasm_bindgen_test]
fn leaves_live_page_untouched() {
    let document = document_with("<nav>Links</nav><p>Body text</p>");

    extract_page_content(&document).unwrap();

    assert!(document.query_selector("nav").unwrap().is_some());
}

#[wasm_bindgen_test]
fn truncates_long_pages() {
    let long = "word ".repeat(5_000);
    let document = document_with(&format!("<article>{}</article>", long));

    let text = extract_page_content(&document).unwrap();

    assert!(text.chars().count() <= MAX_PAGE_TEXT_CHARS);
}
