use dioxus::prelude::*;

use crate::state::app_state::AppState;

/// Shows the last commit error until it is dismissed or a clean commit clears it.
#[component]
pub fn ErrorBanner() -> Element {
    let mut app_state = use_context::<Signal<AppState>>();
    let message = app_state.read().error_message.clone().unwrap_or_default();
    let visible = !message.is_empty();

    rsx! {
        if visible {
            div { class: "error-banner", role: "alert",
                pre { "{message}" }
                button {
                    onclick: move |_| app_state.write().error_message = None,
                    "Dismiss"
                }
            }
        }
    }
}
