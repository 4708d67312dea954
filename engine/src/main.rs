// Engine entry point: a line-oriented calculator driving one value edit.
// Each stdin line is committed like typed input and the normalized text is printed.
use anyhow::Result;
use engine::config::EditSettings;
use engine::data::CurrencyRegistry;
use engine::widget::{CommitSession, ValueEdit, ValueEditOptions};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::info;

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays the calculator output
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    info!("Starting value edit calculator...");

    let settings = EditSettings::load_default()?;
    let registry = CurrencyRegistry::bundled(&settings.default_currency)?;
    info!(currency = %settings.default_currency, precision = settings.default_precision, "Values are denominated in the default currency");

    let mut edit = ValueEdit::new(
        ValueEditOptions::from_settings(&settings, true),
        settings.locale.clone(),
        Some(Arc::new(registry)),
    );
    let mut session = CommitSession::new();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let mut notifier = |message: &str| eprintln!("Error: {}", message);
        edit.commit(&line, &mut session, &mut notifier);

        match edit.calculated_expression(&session) {
            Some(expression) => writeln!(out, "{} = {}", expression, edit.text())?,
            None => writeln!(out, "{}", edit.text())?,
        }
    }

    Ok(())
}
