/// Receives the newline-joined error text of a failed commit, e.g. to show a dialog.
pub trait ErrorNotifier {
    fn notify_error(&mut self, message: &str);
}

impl<F> ErrorNotifier for F
where
    F: FnMut(&str),
{
    fn notify_error(&mut self, message: &str) {
        self(message)
    }
}
