use std::ops::Range;

use dioxus::prelude::*;
use engine::widget::{CommitSession, FocusReason, ValidationState, ValueEdit};

use crate::config::FieldConfig;
use crate::state::app_state::AppState;

// Signals behind one field, bundled so every handler can share them.
#[derive(Clone, Copy)]
struct FieldHandles {
    edit: Signal<ValueEdit>,
    text: Signal<String>,
    dirty: Signal<bool>,
    session: Signal<CommitSession>,
    app_state: Signal<AppState>,
}

impl FieldHandles {
    fn dom_id(&self) -> String {
        format!("value-{}", self.edit.peek().id())
    }

    /// Runs fixup on the edited text and shows the normalized result.
    fn commit(mut self) {
        if !*self.dirty.peek() {
            return;
        }
        let raw = self.text.peek().clone();
        let mut reported: Option<String> = None;
        let mut notifier = |message: &str| reported = Some(message.to_string());
        let report = self.edit.write().commit(&raw, &mut self.session.write(), &mut notifier);

        tracing::info!(
            widget = %self.edit.peek().id(),
            value = report.value,
            calculated = report.calculated,
            errors = report.errors.len(),
            "Value committed"
        );
        if let Some(message) = reported {
            self.app_state.write().error_message = Some(message);
        } else if report.errors.is_empty() {
            self.app_state.write().error_message = None;
        }
        self.text.set(self.edit.peek().text());
        self.dirty.set(false);
    }

    fn step(mut self, steps: i32) {
        self.edit.write().step_by(steps);
        self.text.set(self.edit.peek().text());
        self.dirty.set(false);
    }

    // Selection offsets are in characters; the webview counts UTF-16 units.
    fn select(self, text: &str, range: Range<usize>) {
        let utf16 = |chars: usize| -> usize { text.chars().take(chars).map(char::len_utf16).sum() };
        let script = format!(
            r#"document.getElementById("{}")?.setSelectionRange({}, {});"#,
            self.dom_id(),
            utf16(range.start),
            utf16(range.end)
        );
        let _ = eval(&script);
    }
}

/// A labelled value edit field. Keystrokes are validated, the text is
/// committed (evaluated and normalized) on Enter or when focus leaves.
#[component]
pub fn ValueInput(field: FieldConfig) -> Element {
    let app_state = use_context::<Signal<AppState>>();
    let session = use_context::<Signal<CommitSession>>();
    let edit = use_signal(|| app_state.peek().new_value_edit(&field));
    let text = use_signal(|| edit.peek().text());
    let dirty = use_signal(|| false);
    let handles = FieldHandles {
        edit,
        text,
        dirty,
        session,
        app_state,
    };

    let dom_id = handles.dom_id();
    let unit = edit
        .read()
        .currency()
        .map(|currency| currency.symbol_or_code().to_string())
        .unwrap_or_default();
    let expression = edit
        .read()
        .calculated_expression(&session.read())
        .map(str::to_string)
        .unwrap_or_default();
    let has_expression = !expression.is_empty();

    rsx! {
        div { class: "value-input",
            label { r#for: "{dom_id}", title: "{unit}", "{field.label}" }
            input {
                id: "{dom_id}",
                r#type: "text",
                value: "{text}",
                onmousedown: move |_| {
                    let mut app_state = handles.app_state;
                    app_state.write().focus_reason = FocusReason::Mouse;
                },
                onfocusin: move |_| {
                    let mut app_state = handles.app_state;
                    let reason = std::mem::replace(&mut app_state.write().focus_reason, FocusReason::Other);
                    let current = handles.text.peek().clone();
                    if let Some(range) = handles.edit.peek().focus_in(reason) {
                        handles.select(&current, range);
                    }
                },
                onfocusout: move |_| handles.commit(),
                onkeydown: move |evt: KeyboardEvent| {
                    match evt.key() {
                        Key::Tab => {
                            let mut app_state = handles.app_state;
                            app_state.write().focus_reason = if evt.modifiers().contains(Modifiers::SHIFT) {
                                FocusReason::Backtab
                            } else {
                                FocusReason::Tab
                            };
                        }
                        Key::Enter => {
                            handles.commit();
                            handles.edit.peek().editing_finished(true);
                        }
                        Key::ArrowUp => handles.step(1),
                        Key::ArrowDown => handles.step(-1),
                        _ => {}
                    }
                },
                oninput: move |evt: FormEvent| {
                    let raw = evt.value();
                    let cursor = raw.chars().count();
                    let state = handles.edit.peek().validate(&raw, cursor);
                    if state == ValidationState::Invalid {
                        tracing::debug!(input = %raw, "Rejected input");
                        return;
                    }
                    let reset = handles.edit.peek().cursor_reset_for(&raw);
                    let (mut text, mut dirty) = (handles.text, handles.dirty);
                    text.set(raw.clone());
                    dirty.set(true);
                    if let Some(position) = reset {
                        handles.select(&raw, position..position);
                    }
                },
            }
            if has_expression {
                span { class: "expression", "= {expression}" }
            }
        }
    }
}
