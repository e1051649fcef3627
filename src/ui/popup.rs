/// Popup UI for Page Summarizer extension

use log::{error, info};
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::client::{ContentScriptPage, RuntimeTransport, SummaryClient, active_tab};
use crate::config::RetryPolicy;
use crate::error::PopupError;
use crate::summary::Summary;
use crate::ui::components::SummaryView;

const CONTENT_SCRIPT_FILE: &str = "content.js";

#[derive(Clone, PartialEq)]
enum PopupState {
    Loading(String),
    Ready(Summary),
    Error(String),
}

async fn summarize_active_tab() -> Result<Summary, PopupError> {
    let tab = active_tab().await?;
    if tab.is_restricted() {
        return Err(PopupError::RestrictedPage);
    }

    let client = SummaryClient::new(
        RuntimeTransport,
        ContentScriptPage {
            script_file: CONTENT_SCRIPT_FILE,
        },
        RetryPolicy::default(),
    );
    client.fetch_summary(tab.id).await
}

fn load(state: UseStateHandle<PopupState>) {
    state.set(PopupState::Loading("Summarizing page...".to_string()));

    spawn_local(async move {
        match summarize_active_tab().await {
            Ok(summary) => {
                info!("Summary ready");
                state.set(PopupState::Ready(summary));
            }
            Err(e) => {
                error!("Popup failed: {}", e);
                state.set(PopupState::Error(e.to_string()));
            }
        }
    });
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| PopupState::Loading("Summarizing page...".to_string()));

    // Start on mount
    {
        let state = state.clone();
        use_effect_with((), move |_| {
            load(state);
            || ()
        });
    }

    let on_retry = {
        let state = state.clone();
        Callback::from(move |_| load(state.clone()))
    };

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Page Summarizer"}</h1>

            {match &*state {
                PopupState::Loading(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                PopupState::Ready(summary) => html! {
                    <SummaryView summary={summary.clone()} />
                },
                PopupState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                        <Button onclick={on_retry} variant={ButtonVariant::Secondary} block={true}>
                            {"Try again"}
                        </Button>
                    </div>
                },
            }}

            <p class="footer-popup">
                {"Page Summarizer v0.1.0"}
            </p>
        </div>
    }
}
