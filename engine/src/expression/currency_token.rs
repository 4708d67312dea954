// Currency tokens such as "USD5", "5€" or a bare "GBP", converted into the target currency
use shared::models::Currency;

use super::{CurrencyContext, EvalState, Evaluator};
use crate::error::ExprError;

fn is_amount_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '^' | '.')
}

/// Code first, then the default currency's own symbol, then any unambiguous symbol.
fn lookup<'c>(currencies: CurrencyContext<'c>, token: &str) -> Option<&'c Currency> {
    if token.is_empty() {
        return None;
    }
    currencies
        .source
        .find_currency(token)
        .or_else(|| {
            let default = currencies.source.default_currency();
            (!default.symbol.is_empty() && default.symbol == token).then_some(default)
        })
        .or_else(|| currencies.source.find_currency_symbol(token, true))
}

fn convert(currencies: CurrencyContext<'_>, amount: f64, from: &Currency) -> f64 {
    if from.is_same(currencies.target) {
        amount
    } else {
        currencies.source.convert(amount, from, currencies.target)
    }
}

pub(super) fn currency_amount(
    ev: &Evaluator<'_>,
    currencies: CurrencyContext<'_>,
    input: &str,
    state: &mut EvalState,
) -> Option<f64> {
    let Some(first) = input.find(is_amount_char) else {
        // Only a currency: one unit of it
        return match lookup(currencies, input) {
            Some(currency) => {
                state.calculated = true;
                Some(convert(currencies, 1.0, currency))
            }
            None => {
                state.errors.push(ExprError::UnknownCurrency(input.to_string()));
                None
            }
        };
    };

    if first > 0 {
        let token = input[..first].trim();
        if let Some(currency) = lookup(currencies, token) {
            let amount = ev.eval(&input[first..], state);
            state.calculated = true;
            return Some(convert(currencies, amount, currency));
        }
        state.errors.push(ExprError::UnknownCurrency(token.to_string()));
    }

    // amount characters are all ASCII, so the byte after the last one starts the suffix
    let end = input.rfind(is_amount_char)? + 1;
    if end < input.len() {
        let token = input[end..].trim();
        if let Some(currency) = lookup(currencies, token) {
            let amount = ev.eval(&input[..end], state);
            state.calculated = true;
            return Some(convert(currencies, amount, currency));
        }
        state.errors.push(ExprError::UnknownCurrency(token.to_string()));
    }
    None
}

#[cfg(test)]
mod tests {
    use crate::data::{CurrencyRegistry, CurrencySource};
    use crate::error::ExprError;
    use crate::expression::Evaluator;
    use shared::models::Currency;

    // 1 EUR = 1.25 USD = 10 SEK = 10.5 NOK
    fn registry() -> CurrencyRegistry {
        CurrencyRegistry::new(
            vec![
                Currency::new("EUR", "€", false, 2, 1.0),
                Currency::new("USD", "$", true, 2, 1.25),
                Currency::new("SEK", "kr", false, 2, 10.0),
                Currency::new("NOK", "kr", false, 2, 10.5),
                Currency::new("CHF", "Fr.", true, 2, 0.95),
            ],
            "EUR",
        )
        .unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[test]
    fn test_suffix_code_converts_into_target() {
        let registry = registry();
        let usd = registry.find_currency("USD").unwrap();
        let result = Evaluator::with_currencies(&registry, usd).evaluate("5EUR");
        assert_close(result.value, 6.25);
        assert!(result.calculated);
        assert!(result.is_ok());
    }

    #[test]
    fn test_prefix_symbol_converts_into_target() {
        let registry = registry();
        let eur = registry.find_currency("EUR").unwrap();
        let result = Evaluator::with_currencies(&registry, eur).evaluate("$5");
        assert_close(result.value, 4.0);
        assert!(result.is_ok());
    }

    #[test]
    fn test_same_currency_is_not_converted() {
        let registry = registry();
        let eur = registry.find_currency("EUR").unwrap();
        let result = Evaluator::with_currencies(&registry, eur).evaluate("12.5€");
        assert_close(result.value, 12.5);
        assert!(result.calculated);
    }

    #[test]
    fn test_bare_currency_is_one_unit() {
        let registry = registry();
        let eur = registry.find_currency("EUR").unwrap();
        let result = Evaluator::with_currencies(&registry, eur).evaluate("SEK");
        assert_close(result.value, 0.1);
        assert!(result.is_ok());
    }

    #[test]
    fn test_currency_terms_mix_with_arithmetic() {
        let registry = registry();
        let eur = registry.find_currency("EUR").unwrap();
        let result = Evaluator::with_currencies(&registry, eur).evaluate("10+$5*2");
        assert_close(result.value, 18.0);

        // the amount itself may be a power
        let result = Evaluator::with_currencies(&registry, eur).evaluate("2^3USD");
        assert_close(result.value, 6.4);
        assert!(result.is_ok());
    }

    #[test]
    fn test_fuzzy_symbol() {
        let registry = registry();
        let eur = registry.find_currency("EUR").unwrap();
        let result = Evaluator::with_currencies(&registry, eur).evaluate("fr19");
        assert_close(result.value, 20.0);
        assert!(result.is_ok());
    }

    #[test]
    fn test_unknown_currency_reports_token_once() {
        let registry = registry();
        let eur = registry.find_currency("EUR").unwrap();
        let result = Evaluator::with_currencies(&registry, eur).evaluate("5XYZ");
        assert_eq!(result.errors, vec![ExprError::UnknownCurrency("XYZ".to_string())]);
        assert_eq!(result.value, 0.0);

        let result = Evaluator::with_currencies(&registry, eur).evaluate("XYZ5");
        assert_eq!(result.errors, vec![ExprError::UnknownCurrency("XYZ".to_string())]);
    }

    #[test]
    fn test_ambiguous_symbol_is_reported() {
        let registry = registry();
        let eur = registry.find_currency("EUR").unwrap();
        let result = Evaluator::with_currencies(&registry, eur).evaluate("100kr");
        assert_eq!(result.errors, vec![ExprError::UnknownCurrency("kr".to_string())]);
    }

    #[test]
    fn test_without_currencies_letters_are_unrecognized() {
        let result = Evaluator::new().evaluate("5EUR");
        assert_eq!(result.errors, vec![ExprError::UnrecognizedCharacters]);
    }
}
