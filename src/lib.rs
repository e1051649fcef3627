/// Page Summarizer - Chrome Extension that summarizes the active tab
/// with the browser's built-in AI Summarizer
/// Built with Rust + WASM + Yew

mod background;
mod chrome;
pub mod client;
pub mod config;
mod content;
pub mod coordinator;
pub mod error;
pub mod extract;
pub mod messages;
pub mod storage;
pub mod summarizer;
pub mod summary;
pub mod tab_data;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Install the coordinator in the service worker
#[wasm_bindgen]
pub fn start_background() {
    background::install(config::SummarizerConfig::default());
}

// Install the page text extractor in the inspected tab
#[wasm_bindgen]
pub fn start_content_script() {
    content::install();
}
