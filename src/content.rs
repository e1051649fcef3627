/// Content script: answers text extraction requests from the popup

use js_sys::Function;
use log::error;
use wasm_bindgen::prelude::*;

use crate::chrome;
use crate::extract::extract_page_content;
use crate::messages::Request;

const INSTALLED_FLAG: &str = "__pageSummarizerInstalled";

/// The popup injects this script every time it opens; only listen once per page
fn mark_installed() -> bool {
    let global = js_sys::global();
    let flag = JsValue::from_str(INSTALLED_FLAG);
    if js_sys::Reflect::has(&global, &flag).unwrap_or(false) {
        return false;
    }
    js_sys::Reflect::set(&global, &flag, &JsValue::TRUE).unwrap_or(false)
}

pub fn install() {
    if !mark_installed() {
        return;
    }

    let closure = Closure::<dyn FnMut(JsValue, JsValue, Function) -> bool>::new(
        |message: JsValue, _sender: JsValue, send_response: Function| {
            if !matches!(serde_wasm_bindgen::from_value::<Request>(message), Ok(Request::ExtractPageContent)) {
                return false;
            }

            let text = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| extract_page_content(&document))
                .unwrap_or_default();

            if let Err(e) = send_response.call1(&JsValue::UNDEFINED, &JsValue::from_str(&text)) {
                error!("[content_script] Failed to send response: {:?}", e);
            }
            false
        },
    );
    chrome::add_message_listener(closure.as_ref().unchecked_ref());
    closure.forget();
}
