// Plain numbers, the bottom of the evaluator
use super::EvalState;
use crate::error::ExprError;

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '.')
}

/// Parses a canonical decimal. Unparseable text is worth 0. Without currency
/// lookups, letters and symbols are reported since nothing else could explain them.
pub(super) fn parse_number(input: &str, currency_aware: bool, state: &mut EvalState) -> f64 {
    if !currency_aware && !input.chars().all(is_number_char) {
        state.errors.push(ExprError::UnrecognizedCharacters);
    }
    input
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}
