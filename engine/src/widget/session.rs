// State shared by the value edits of one form while the user commits values.
// Lives with the caller and is passed to each commit; single UI thread only.
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(Uuid);

impl WidgetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct CommitSession {
    // Expression text of the latest successful calculation and the edit that produced it
    calculated: Option<(WidgetId, String)>,
    last_error: Option<String>,
}

impl CommitSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The expression `id` last calculated, while no other edit has calculated since.
    pub fn calculated_text_for(&self, id: WidgetId) -> Option<&str> {
        match &self.calculated {
            Some((producer, text)) if *producer == id => Some(text),
            _ => None,
        }
    }

    pub(crate) fn remember_calculation(&mut self, id: WidgetId, text: String) {
        self.calculated = Some((id, text));
    }

    pub(crate) fn forget_calculation(&mut self, id: WidgetId) {
        if matches!(&self.calculated, Some((producer, _)) if *producer == id) {
            self.calculated = None;
        }
    }

    /// False for an exact repeat of the previous message, which is then forgotten,
    /// so a third identical commit is reported again.
    pub(crate) fn should_notify(&mut self, message: &str) -> bool {
        if self.last_error.as_deref() == Some(message) {
            self.last_error = None;
            false
        } else {
            self.last_error = Some(message.to_string());
            true
        }
    }
}
