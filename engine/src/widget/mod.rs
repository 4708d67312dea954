// Headless value edit: the state and behaviour behind a currency-aware spin box.
// Front-ends own the rendering and feed text/focus events in.
pub mod notifier;
pub mod session;
pub mod value_edit;

pub use notifier::ErrorNotifier;
pub use session::{CommitSession, WidgetId};
pub use value_edit::{
    CurrencyAttach, FixupReport, FocusReason, SymbolDisplay, ValidationState, ValueEdit, ValueEditOptions,
};
