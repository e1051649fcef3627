/// Service worker wiring: message handler and tab cleanup around the coordinator

use std::rc::Rc;

use js_sys::Function;
use log::error;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::chrome;
use crate::client::to_js;
use crate::config::SummarizerConfig;
use crate::coordinator::TaskCoordinator;
use crate::messages::{Request, dispatch};
use crate::storage::SessionStore;
use crate::summarizer::ChromeSummarizer;
use crate::summary::TabId;

type Coordinator = TaskCoordinator<SessionStore, ChromeSummarizer>;

fn respond(send_response: &Function, value: &JsValue) {
    if let Err(e) = send_response.call1(&JsValue::UNDEFINED, value) {
        error!("[background] Failed to send response: {:?}", e);
    }
}

fn install_message_listener(coordinator: Rc<Coordinator>) {
    let closure = Closure::<dyn FnMut(JsValue, JsValue, Function) -> bool>::new(
        move |message: JsValue, _sender: JsValue, send_response: Function| {
            let request: Request = match serde_wasm_bindgen::from_value(message) {
                Ok(request) => request,
                Err(_) => return false,
            };
            if !request.handled_by_background() {
                return false;
            }
            let coordinator = coordinator.clone();
            spawn_local(async move {
                if let Some(response) = dispatch(&coordinator, request).await {
                    match to_js(&response) {
                        Ok(value) => respond(&send_response, &value),
                        Err(e) => error!("[background] {}", e),
                    }
                }
            });

            // Keep the channel open for the async response
            true
        },
    );
    chrome::add_message_listener(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn install_tab_removed_listener(coordinator: Rc<Coordinator>) {
    let closure = Closure::<dyn FnMut(TabId)>::new(move |tab_id: TabId| {
        let coordinator = coordinator.clone();
        spawn_local(async move {
            coordinator.on_tab_removed(tab_id).await;
        });
    });
    chrome::add_tab_removed_listener(closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn install(config: SummarizerConfig) {
    let coordinator = Rc::new(TaskCoordinator::new(SessionStore, ChromeSummarizer, config));
    install_message_listener(coordinator.clone());
    install_tab_removed_listener(coordinator);
}
