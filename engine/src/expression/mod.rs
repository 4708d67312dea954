//! Arithmetic evaluation for value edit input.
//!
//! Expressions are reduced by splitting the text on operators of decreasing
//! precedence, outermost first: additive terms, then factors, then percent,
//! then currency tokens, then powers, and finally plain numbers. There are no
//! parentheses. Malformed input never aborts evaluation; it produces
//! [`ExprError`] diagnostics next to a best-effort value.
//!
//! Input is expected in canonical form (`.` decimal point, ASCII signs and
//! `%`, no grouping); see [`shared::NumberLocale::to_canonical`].

mod currency_token;
mod leaf;
mod operators;

use shared::models::Currency;

use crate::data::CurrencySource;
use crate::error::ExprError;

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub value: f64,
    pub errors: Vec<ExprError>,
    /// Whether any operator or currency conversion was applied, as opposed to a plain number.
    pub calculated: bool,
}

impl Evaluation {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// All diagnostics joined by newlines, or `None` when there were none.
    pub fn error_message(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        Some(messages.join("\n"))
    }
}

/// Currency lookups are only attempted when both a source and a target currency are known.
#[derive(Debug, Clone, Copy)]
pub struct CurrencyContext<'a> {
    pub source: &'a dyn CurrencySource,
    pub target: &'a Currency,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator<'a> {
    currencies: Option<CurrencyContext<'a>>,
}

/// Nesting limit for the recursive split. Chains of `^`, `%` or signed
/// operands nest one level per operator.
const MAX_DEPTH: usize = 128;

#[derive(Debug, Default)]
struct EvalState {
    errors: Vec<ExprError>,
    calculated: bool,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new() -> Self {
        Self { currencies: None }
    }

    pub fn with_currencies(source: &'a dyn CurrencySource, target: &'a Currency) -> Self {
        Self {
            currencies: Some(CurrencyContext { source, target }),
        }
    }

    pub fn is_currency_aware(&self) -> bool {
        self.currencies.is_some()
    }

    pub fn evaluate(&self, input: &str) -> Evaluation {
        let mut state = EvalState::default();
        let value = self.eval(input, &mut state);
        tracing::debug!(
            input = %input,
            value,
            calculated = state.calculated,
            errors = state.errors.len(),
            "Evaluated expression"
        );
        Evaluation {
            value,
            errors: state.errors,
            calculated: state.calculated,
        }
    }

    fn eval(&self, input: &str, state: &mut EvalState) -> f64 {
        if state.depth >= MAX_DEPTH {
            if !state.errors.contains(&ExprError::TooComplex) {
                state.errors.push(ExprError::TooComplex);
            }
            return 0.0;
        }
        state.depth += 1;
        let value = self.eval_level(input, state);
        state.depth -= 1;
        value
    }

    fn eval_level(&self, input: &str, state: &mut EvalState) -> f64 {
        let input = input.trim();
        if input.is_empty() {
            return 0.0;
        }
        if let Some(value) = operators::additive(self, input, state) {
            return value;
        }

        let input = input.replace("**", "^");
        if let Some(value) = operators::multiplicative(self, &input, state) {
            return value;
        }
        if let Some(value) = operators::percent(self, &input, state) {
            return value;
        }
        if let Some(currencies) = self.currencies {
            if let Some(value) = currency_token::currency_amount(self, currencies, &input, state) {
                return value;
            }
        }
        if let Some(value) = operators::power(self, &input, state) {
            return value;
        }
        leaf::parse_number(&input, self.is_currency_aware(), state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str) -> Evaluation {
        Evaluator::new().evaluate(input)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[test]
    fn test_plain_numbers_parse_like_decimals() {
        for (input, expected) in [("42", 42.0), ("-5", -5.0), ("+3.25", 3.25), ("0.5", 0.5), (".5", 0.5), ("7.", 7.0)] {
            let result = eval(input);
            assert_close(result.value, expected);
            assert!(result.is_ok());
            assert!(!result.calculated, "{} should not count as calculated", input);
        }
    }

    #[test]
    fn test_empty_input_is_zero() {
        let result = eval("   ");
        assert_eq!(result.value, 0.0);
        assert!(result.is_ok());
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let result = eval("2+3*4");
        assert_close(result.value, 14.0);
        assert!(result.calculated);
        assert!(result.is_ok());
        assert_close(eval("2*3+4").value, 10.0);
    }

    #[test]
    fn test_subtraction_left_to_right() {
        assert_close(eval("10-2-3").value, 5.0);
        assert_close(eval("-5+3").value, -2.0);
        assert_close(eval("2--3").value, 5.0);
        assert_close(eval("2+-3").value, -1.0);
    }

    #[test]
    fn test_signed_operands_after_operators() {
        assert_close(eval("2*-3").value, -6.0);
        assert_close(eval("-2*-3").value, 6.0);
        assert_close(eval("3*-2+1").value, -5.0);
        assert_close(eval("12/-4").value, -3.0);
        assert_close(eval("2^-1").value, 0.5);
    }

    #[test]
    fn test_division_left_to_right() {
        assert_close(eval("100/4/5").value, 5.0);
        assert_close(eval("6/3*2").value, 4.0);
    }

    #[test]
    fn test_division_by_zero_is_skipped() {
        let result = eval("10/0");
        assert_close(result.value, 10.0);
        assert_eq!(result.errors, vec![ExprError::DivisionByZero]);

        let result = eval("10/(0)");
        assert!(!result.is_ok());
    }

    #[test]
    fn test_division_by_zero_valued_expression() {
        let result = eval("10/2^0-1");
        // additive split first: 10/2^0 minus 1
        assert_close(result.value, 9.0);
        let result = eval("10/0^1");
        assert_close(result.value, 10.0);
        assert_eq!(result.errors, vec![ExprError::DivisionByZero]);
    }

    #[test]
    fn test_empty_factor_and_denominator() {
        let result = eval("2*");
        assert_close(result.value, 2.0);
        assert_eq!(result.errors, vec![ExprError::EmptyFactor]);

        let result = eval("8/");
        assert_close(result.value, 8.0);
        assert_eq!(result.errors, vec![ExprError::EmptyDenominator]);

        let result = eval("*3");
        assert_close(result.value, 3.0);
        assert_eq!(result.errors, vec![ExprError::EmptyFactor]);
    }

    #[test]
    fn test_empty_operand_keeps_previous_operator() {
        let result = eval("6/*3");
        assert_close(result.value, 2.0);
        assert_eq!(result.errors, vec![ExprError::EmptyDenominator]);

        let result = eval("6*/3");
        assert_close(result.value, 18.0);
        assert_eq!(result.errors, vec![ExprError::EmptyFactor]);
    }

    #[test]
    fn test_long_power_chain_is_cut_off() {
        let result = eval(&vec!["2"; 5_000].join("^"));
        assert_eq!(result.errors, vec![ExprError::TooComplex]);
        assert!(result.calculated);
    }

    #[test]
    fn test_long_percent_and_sign_chains_are_cut_off() {
        let result = eval(&"50%".repeat(5_000));
        assert_eq!(result.errors, vec![ExprError::TooComplex]);

        let result = eval(&vec!["2"; 3_000].join("^-"));
        assert!(result.errors.contains(&ExprError::TooComplex));
    }

    #[test]
    fn test_nesting_below_the_limit_is_untouched() {
        let result = eval(&vec!["1"; 50].join("^"));
        assert_close(result.value, 1.0);
        assert!(result.is_ok());
    }

    #[test]
    fn test_percent() {
        assert_close(eval("50%").value, 0.5);
        assert_close(eval("%50").value, 0.5);
        assert_close(eval("%").value, 0.01);
        assert_close(eval("50%*200").value, 100.0);
        assert_close(eval("50%200").value, 100.0);
        assert_close(eval("200+10%").value, 200.1);
        assert!(eval("50%").calculated);
    }

    #[test]
    fn test_power() {
        assert_close(eval("2^3").value, 8.0);
        assert_close(eval("2**3").value, 8.0);
        // right-associative through the split on the first caret
        assert_close(eval("2^3^2").value, 512.0);
        assert_close(eval("2*3^2").value, 18.0);
    }

    #[test]
    fn test_empty_base_and_exponent() {
        let result = eval("^3");
        assert_eq!(result.errors, vec![ExprError::EmptyBase]);
        assert_eq!(result.value, 0.0);

        let result = eval("2^");
        assert_eq!(result.errors, vec![ExprError::EmptyExponent]);
        assert_eq!(result.value, 1.0);
    }

    #[test]
    fn test_unrecognized_characters() {
        let result = eval("12abc");
        assert_eq!(result.errors, vec![ExprError::UnrecognizedCharacters]);
        assert_eq!(result.value, 0.0);
    }

    #[test]
    fn test_errors_accumulate_across_terms() {
        let result = eval("1/0+2*+x");
        assert!(result.errors.contains(&ExprError::DivisionByZero));
        assert!(result.errors.contains(&ExprError::UnrecognizedCharacters));
        let message = result.error_message().unwrap();
        assert_eq!(message.lines().count(), result.errors.len());
    }

    #[test]
    fn test_error_message_is_none_without_errors() {
        assert_eq!(eval("1+1").error_message(), None);
    }
}
