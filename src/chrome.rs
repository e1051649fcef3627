/// Bindings to the extension host APIs (chrome.* and the built-in Summarizer)
use js_sys::Function;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    // chrome.storage.session
    #[wasm_bindgen(js_namespace = ["chrome", "storage", "session"], js_name = get, catch)]
    pub async fn session_get(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "session"], js_name = set, catch)]
    pub async fn session_set(items: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "session"], js_name = remove, catch)]
    pub async fn session_remove(key: &str) -> Result<(), JsValue>;

    // chrome.runtime
    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = sendMessage, catch)]
    pub async fn runtime_send_message(message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    pub fn add_message_listener(callback: &Function);

    // chrome.tabs
    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = query, catch)]
    pub async fn tabs_query(query: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = sendMessage, catch)]
    pub async fn tabs_send_message(tab_id: i32, message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "tabs", "onRemoved"], js_name = addListener)]
    pub fn add_tab_removed_listener(callback: &Function);

    // chrome.scripting
    #[wasm_bindgen(js_namespace = ["chrome", "scripting"], js_name = executeScript, catch)]
    pub async fn execute_script(injection: JsValue) -> Result<JsValue, JsValue>;
}

#[wasm_bindgen]
extern "C" {
    /// Global `Summarizer` (Chrome built-in AI)
    pub type Summarizer;

    #[wasm_bindgen(static_method_of = Summarizer, js_name = availability, catch)]
    pub async fn availability() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(static_method_of = Summarizer, js_name = create, catch)]
    pub async fn create(options: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub async fn summarize(this: &Summarizer, text: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method)]
    pub fn destroy(this: &Summarizer);
}

/// Whether the `Summarizer` global exists in this context
pub fn summarizer_present() -> bool {
    js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str("Summarizer")).unwrap_or(false)
}

/// Best-effort human readable message from a rejected promise value
pub fn error_message(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}
