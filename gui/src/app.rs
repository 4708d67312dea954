#![allow(non_snake_case)]
use dioxus::prelude::*;
use engine::widget::CommitSession;

use crate::components::{ErrorBanner, ValueInput};
use crate::config::AppConfig;
use crate::state::app_state::AppState;

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 24px; }
.value-input { display: flex; gap: 12px; align-items: center; margin-bottom: 10px; }
.value-input label { width: 100px; }
.value-input input { width: 220px; text-align: right; }
.expression { color: #777; font-size: 0.9em; }
.error-banner { background: #fdecea; border: 1px solid #f5c2c0; padding: 8px; margin-bottom: 16px; }
.error-banner pre { margin: 0 0 6px 0; white-space: pre-wrap; }
"#;

#[component]
pub fn App() -> Element {
    let app_config = use_context::<AppConfig>();
    let initial_state = use_context::<AppState>();
    use_context_provider(move || Signal::new(initial_state));
    use_context_provider(|| Signal::new(CommitSession::new()));

    rsx! {
        style { {STYLE} }
        h2 { "{app_config.window_title}" }
        ErrorBanner {}
        for field in app_config.fields.iter().cloned() {
            ValueInput { key: "{field.label}", field }
        }
    }
}
