// Currency-aware numeric input: display affixes, validation while typing,
// and expression evaluation when the input is committed.
use shared::models::Currency;
use shared::NumberLocale;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use super::notifier::ErrorNotifier;
use super::session::{CommitSession, WidgetId};
use crate::config::settings::{EditSettings, MAX_VALUE};
use crate::data::CurrencySource;
use crate::error::ExprError;
use crate::expression::Evaluator;

/// Decimal places used when neither the caller nor an attached currency decides.
pub const MONETARY_DECIMAL_PLACES: u32 = 2;

pub type CommitListener = Arc<dyn Fn(f64) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueEditOptions {
    pub lower: f64,
    pub upper: f64,
    pub step: f64,
    pub value: f64,
    /// `None` takes the default currency's digits, or two places.
    pub precision: Option<u32>,
    pub show_currency: bool,
}

impl ValueEditOptions {
    pub fn new(allow_negative: bool) -> Self {
        Self {
            lower: if allow_negative { -MAX_VALUE } else { 0.0 },
            ..Self::default()
        }
    }

    pub fn from_settings(settings: &EditSettings, allow_negative: bool) -> Self {
        Self {
            lower: if allow_negative { -settings.max_value } else { 0.0 },
            upper: settings.max_value,
            precision: Some(settings.default_precision),
            ..Self::default()
        }
    }
}

impl Default for ValueEditOptions {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: MAX_VALUE,
            step: 1.0,
            value: 0.0,
            precision: None,
            show_currency: true,
        }
    }
}

/// Whether an attached currency is shown by symbol or by code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolDisplay {
    /// Symbol for the default currency, code for any other.
    #[default]
    Auto,
    Force,
    Suppress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CurrencyAttach {
    pub keep_precision: bool,
    pub display: SymbolDisplay,
    /// Show the currency without converting currency terms into it.
    pub temporary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationState {
    Invalid,
    Intermediate,
    Acceptable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusReason {
    Tab,
    Backtab,
    Mouse,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixupReport {
    /// Normalized text, without affixes.
    pub text: String,
    pub value: f64,
    pub errors: Vec<ExprError>,
    pub calculated: bool,
    /// Whether the notifier was called for this commit.
    pub notified: bool,
}

pub struct ValueEdit {
    id: WidgetId,
    locale: NumberLocale,
    currencies: Option<Arc<dyn CurrencySource>>,
    currency: Option<Currency>,
    prefix: String,
    suffix: String,
    value: f64,
    minimum: f64,
    maximum: f64,
    step: f64,
    precision: u32,
    listeners: Vec<CommitListener>,
}

impl ValueEdit {
    pub fn new(
        options: ValueEditOptions,
        locale: NumberLocale,
        currencies: Option<Arc<dyn CurrencySource>>,
    ) -> Self {
        let mut edit = Self {
            id: WidgetId::new(),
            locale,
            currencies,
            currency: None,
            prefix: String::new(),
            suffix: String::new(),
            value: 0.0,
            minimum: options.lower,
            maximum: options.upper.max(options.lower),
            step: options.step,
            precision: options.precision.unwrap_or(MONETARY_DECIMAL_PLACES),
            listeners: Vec::new(),
        };

        if options.show_currency {
            match edit.currencies.as_ref().map(|source| source.default_currency().clone()) {
                Some(default) => {
                    if options.precision.is_none() {
                        edit.precision = default.fractional_digits;
                    }
                    edit.set_currency(
                        Some(&default),
                        CurrencyAttach {
                            keep_precision: true,
                            ..CurrencyAttach::default()
                        },
                    );
                }
                None if edit.locale.currency_precedes => edit.prefix = edit.locale.currency_symbol.clone(),
                None => edit.suffix = edit.locale.currency_symbol.clone(),
            }
        }

        edit.set_value(options.value);
        edit
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn locale(&self) -> &NumberLocale {
        &self.locale
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Clamps into range and rounds to the current precision.
    pub fn set_value(&mut self, value: f64) {
        if !value.is_finite() {
            tracing::warn!(widget = %self.id, value, "Ignoring non-finite value");
            return;
        }
        self.value = self.round(value.clamp(self.minimum, self.maximum));
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    pub fn single_step(&self) -> f64 {
        self.step
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn set_range(&mut self, lower: f64, upper: f64, step: f64, precision: u32) {
        self.precision = precision;
        self.minimum = lower;
        self.maximum = upper.max(lower);
        self.step = step;
        self.set_value(self.value);
    }

    pub fn set_single_step(&mut self, step: f64) {
        self.step = step;
    }

    pub fn set_precision(&mut self, precision: u32) {
        if precision == self.precision {
            return;
        }
        self.precision = precision;
        self.set_value(self.value);
    }

    pub fn step_by(&mut self, steps: i32) {
        self.set_value(self.value + f64::from(steps) * self.step);
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The currency values are denominated in; `None` when detached or attached temporarily.
    pub fn currency(&self) -> Option<&Currency> {
        self.currency.as_ref()
    }

    pub fn set_currency(&mut self, currency: Option<&Currency>, attach: CurrencyAttach) {
        self.currency = if attach.temporary { None } else { currency.cloned() };

        let Some(currency) = currency else {
            self.prefix.clear();
            self.suffix.clear();
            return;
        };

        let is_default = self
            .currencies
            .as_ref()
            .map_or(false, |source| source.default_currency().is_same(currency));
        let show_code = match attach.display {
            SymbolDisplay::Auto => !is_default,
            SymbolDisplay::Force => false,
            SymbolDisplay::Suppress => true,
        };

        if show_code || currency.symbol.is_empty() {
            self.prefix.clear();
            self.suffix = currency.code.clone();
        } else if currency.symbol_precedes {
            self.prefix = currency.symbol.clone();
            self.suffix.clear();
        } else {
            self.prefix.clear();
            self.suffix = currency.symbol.clone();
        }

        if !attach.keep_precision {
            self.set_precision(currency.fractional_digits);
        }
        tracing::debug!(
            widget = %self.id,
            currency = %currency.code,
            prefix = %self.prefix,
            suffix = %self.suffix,
            "Currency attached"
        );
    }

    pub fn text(&self) -> String {
        self.text_from_value(self.value)
    }

    pub fn text_from_value(&self, value: f64) -> String {
        let number = self.locale.format_decimal(value, self.precision);
        if self.suffix.is_empty() {
            format!("{}{}", self.prefix, number)
        } else {
            format!("{}{} {}", self.prefix, number, self.suffix)
        }
    }

    /// Parses displayed text back into a value; unparseable text keeps the current value.
    pub fn value_from_text(&self, text: &str) -> f64 {
        let mut number = text.trim().to_string();
        if !self.suffix.is_empty() {
            number = number.replace(&self.suffix, "");
        }
        if !self.prefix.is_empty() {
            number = number.replace(&self.prefix, "");
        }
        self.locale.parse_decimal(&number).unwrap_or(self.value)
    }

    /// Validation while typing. Anything that might still turn into an expression is
    /// intermediate; only a bracket just typed is rejected outright.
    pub fn validate(&self, input: &str, cursor: usize) -> ValidationState {
        let state = self.validate_number(input);
        if state != ValidationState::Invalid {
            return state;
        }

        let before_cursor = cursor.checked_sub(1).and_then(|i| input.chars().nth(i));
        if matches!(before_cursor, Some('[' | ']' | '(' | ')')) {
            return ValidationState::Invalid;
        }

        let mut stripped = input.trim();
        if !self.suffix.is_empty() {
            stripped = stripped.strip_suffix(self.suffix.as_str()).unwrap_or(stripped);
        }
        if !self.prefix.is_empty() {
            stripped = stripped.strip_prefix(self.prefix.as_str()).unwrap_or(stripped);
        }
        let stripped: String = stripped.chars().filter(|c| !c.is_whitespace()).collect();
        if stripped != input && self.validate_number(&stripped) == ValidationState::Acceptable {
            return ValidationState::Acceptable;
        }
        ValidationState::Intermediate
    }

    // Plain spin-box rules: an optionally decorated locale number within range.
    fn validate_number(&self, input: &str) -> ValidationState {
        let mut body = input.trim();
        if !self.prefix.is_empty() {
            body = body.strip_prefix(self.prefix.as_str()).unwrap_or(body).trim_start();
        }
        if !self.suffix.is_empty() {
            body = body.strip_suffix(self.suffix.as_str()).unwrap_or(body).trim_end();
        }

        let canonical = self.locale.to_canonical(&self.locale.strip_grouping(body));
        if canonical.starts_with('-') && self.minimum >= 0.0 {
            return ValidationState::Invalid;
        }
        if canonical.is_empty() || canonical.chars().all(|c| matches!(c, '-' | '+' | '.')) {
            return ValidationState::Intermediate;
        }
        if let Some((_, fraction)) = canonical.split_once('.') {
            if fraction.len() > self.precision as usize {
                return ValidationState::Invalid;
            }
        }
        match self.locale.parse_decimal(body) {
            Ok(value) if value >= self.minimum && value <= self.maximum => ValidationState::Acceptable,
            Ok(_) => ValidationState::Intermediate,
            Err(_) => ValidationState::Invalid,
        }
    }

    fn evaluator(&self) -> Evaluator<'_> {
        match (&self.currencies, &self.currency) {
            (Some(source), Some(target)) => Evaluator::with_currencies(source.as_ref(), target),
            _ => Evaluator::new(),
        }
    }

    /// Evaluates committed text in place, rewriting `input` to the plain locale number.
    /// Errors are reported through `notifier` unless they repeat the previous report.
    pub fn fixup(
        &self,
        input: &mut String,
        session: &mut CommitSession,
        notifier: &mut dyn ErrorNotifier,
    ) -> FixupReport {
        // A lone affix means one unit of that currency
        if !self.prefix.is_empty() && input.starts_with(self.prefix.as_str()) {
            input.replace_range(..self.prefix.len(), "");
            if input.is_empty() {
                *input = self.locale.format_integer(1);
            }
        }
        if !self.suffix.is_empty() && input.ends_with(self.suffix.as_str()) {
            input.truncate(input.len() - self.suffix.len());
            if input.is_empty() {
                *input = self.locale.format_integer(1);
            }
        }

        let expression_text = input.trim().to_string();
        let canonical = self.locale.to_canonical(&self.locale.strip_grouping(input));
        let evaluation = self.evaluator().evaluate(&canonical);

        let mut value = evaluation.value;
        if !value.is_finite() {
            tracing::warn!(widget = %self.id, input = %expression_text, "Expression produced a non-finite value");
            value = 0.0;
        }
        *input = self.locale.format_decimal(value, self.precision);

        if evaluation.calculated && evaluation.is_ok() {
            session.remember_calculation(self.id, expression_text);
        } else {
            session.forget_calculation(self.id);
        }

        let mut notified = false;
        if let Some(message) = evaluation.error_message() {
            tracing::warn!(widget = %self.id, errors = evaluation.errors.len(), "Expression errors: {}", message);
            if session.should_notify(&message) {
                notifier.notify_error(&message);
                notified = true;
            }
        }

        FixupReport {
            text: input.clone(),
            value,
            errors: evaluation.errors,
            calculated: evaluation.calculated,
            notified,
        }
    }

    /// Fixup followed by storing the result as the new value.
    pub fn commit(
        &mut self,
        text: &str,
        session: &mut CommitSession,
        notifier: &mut dyn ErrorNotifier,
    ) -> FixupReport {
        let mut input = text.to_string();
        let report = self.fixup(&mut input, session, notifier);
        self.set_value(report.value);
        report
    }

    /// The expression behind the current value, if this edit calculated it most recently.
    pub fn calculated_expression<'s>(&self, session: &'s CommitSession) -> Option<&'s str> {
        session.calculated_text_for(self.id)
    }

    /// Character range of the number inside `text`, leaving the affixes unselected.
    pub fn select_number(&self, text: &str) -> Range<usize> {
        let len = text.chars().count();
        if self.prefix.is_empty() && self.suffix.is_empty() {
            return 0..len;
        }
        let start = if !self.prefix.is_empty() && text.starts_with(self.prefix.as_str()) {
            self.prefix.chars().count()
        } else {
            0
        };
        let mut end = len;
        if !self.suffix.is_empty() && text.ends_with(&format!(" {}", self.suffix)) {
            end -= self.suffix.chars().count() + 1;
        }
        start..end.max(start)
    }

    /// Keyboard focus selects the number so typing replaces it.
    pub fn focus_in(&self, reason: FocusReason) -> Option<Range<usize>> {
        match reason {
            FocusReason::Tab | FocusReason::Backtab => Some(self.select_number(&self.text())),
            FocusReason::Mouse | FocusReason::Other => None,
        }
    }

    /// Cursor position to jump to when everything but the suffix has been deleted.
    pub fn cursor_reset_for(&self, text: &str) -> Option<usize> {
        (!self.suffix.is_empty() && text == self.suffix).then_some(0)
    }

    pub fn on_committed<F>(&mut self, listener: F)
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    /// Forwards the end of editing to listeners, but only while the edit still has focus.
    pub fn editing_finished(&self, has_focus: bool) -> bool {
        if !has_focus {
            return false;
        }
        for listener in &self.listeners {
            listener(self.value);
        }
        true
    }

    fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.precision as i32);
        let rounded = (value * factor).round() / factor;
        if rounded.is_finite() {
            rounded
        } else {
            value
        }
    }
}

impl fmt::Debug for ValueEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueEdit")
            .field("id", &self.id)
            .field("value", &self.value)
            .field("minimum", &self.minimum)
            .field("maximum", &self.maximum)
            .field("precision", &self.precision)
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("currency", &self.currency.as_ref().map(|c| c.code.as_str()))
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
