// Global application state for the GUI: settings, currencies and the error banner.
// Provided to components as a Signal through the Dioxus context.
use engine::config::EditSettings;
use engine::data::{CurrencyRegistry, CurrencySource};
use engine::widget::{CurrencyAttach, FocusReason, ValueEdit, ValueEditOptions};
use std::sync::Arc;

use crate::config::FieldConfig;

#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: EditSettings,
    pub currencies: Arc<CurrencyRegistry>,
    // Text of the last error dialog, shown until the next clean commit
    pub error_message: Option<String>,
    // How the next field to receive focus is being reached
    pub focus_reason: FocusReason,
}

impl AppState {
    pub fn load() -> Result<Self, anyhow::Error> {
        let settings = EditSettings::load_default()?;
        let currencies = CurrencyRegistry::bundled(&settings.default_currency)?;
        Ok(Self::new(settings, currencies))
    }

    pub fn new(settings: EditSettings, currencies: CurrencyRegistry) -> Self {
        Self {
            settings,
            currencies: Arc::new(currencies),
            error_message: None,
            focus_reason: FocusReason::Other,
        }
    }

    pub fn new_value_edit(&self, field: &FieldConfig) -> ValueEdit {
        let mut options = ValueEditOptions::from_settings(&self.settings, field.allow_negative);
        options.show_currency = field.show_currency;
        if field.precision.is_some() {
            options.precision = field.precision;
        }

        let source: Arc<dyn CurrencySource> = self.currencies.clone();
        let mut edit = ValueEdit::new(options, self.settings.locale.clone(), Some(source));
        if let Some(step) = field.step {
            edit.set_single_step(step);
        }
        let label = field.label.clone();
        edit.on_committed(move |value| tracing::info!(field = %label, value, "Editing finished"));

        if let Some(code) = &field.currency {
            match self.currencies.find_currency(code) {
                Some(currency) => edit.set_currency(
                    Some(currency),
                    CurrencyAttach {
                        keep_precision: field.precision.is_some(),
                        ..CurrencyAttach::default()
                    },
                ),
                None => tracing::warn!(field = %field.label, currency = %code, "Unknown currency in field configuration"),
            }
        }
        edit
    }
}
