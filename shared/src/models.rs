use serde::{Deserialize, Serialize};

/// A currency as seen by the value edit: how to display it and how to convert out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    #[serde(default)]
    pub symbol: String,
    pub symbol_precedes: bool,
    pub fractional_digits: u32,
    /// Units of this currency per one unit of the reference currency (reference rate is 1).
    pub rate: f64,
}

impl Currency {
    pub fn new(code: &str, symbol: &str, symbol_precedes: bool, fractional_digits: u32, rate: f64) -> Self {
        Self {
            code: code.to_string(),
            symbol: symbol.to_string(),
            symbol_precedes,
            fractional_digits,
            rate,
        }
    }

    pub fn symbol_or_code(&self) -> &str {
        if self.symbol.is_empty() {
            &self.code
        } else {
            &self.symbol
        }
    }

    // Currencies are identified by code; two records with the same code are the same currency.
    pub fn is_same(&self, other: &Currency) -> bool {
        self.code == other.code
    }

    pub fn convert_to(&self, amount: f64, target: &Currency) -> f64 {
        if self.is_same(target) {
            return amount;
        }
        amount / self.rate * target.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_through_reference_rate() {
        let eur = Currency::new("EUR", "€", false, 2, 1.0);
        let usd = Currency::new("USD", "$", true, 2, 1.25);
        let sek = Currency::new("SEK", "kr", false, 2, 10.0);

        assert!((eur.convert_to(4.0, &usd) - 5.0).abs() < 1e-9);
        assert!((usd.convert_to(5.0, &eur) - 4.0).abs() < 1e-9);
        // 1 USD = 0.8 EUR = 8 SEK
        assert!((usd.convert_to(1.0, &sek) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_convert_to_same_currency_is_identity() {
        let usd = Currency::new("USD", "$", true, 2, 1.25);
        let other_record = Currency::new("USD", "US$", true, 2, 3.0);
        assert_eq!(usd.convert_to(7.5, &other_record), 7.5);
    }

    #[test]
    fn test_symbol_or_code() {
        assert_eq!(Currency::new("EUR", "€", false, 2, 1.0).symbol_or_code(), "€");
        assert_eq!(Currency::new("XAU", "", false, 4, 0.0005).symbol_or_code(), "XAU");
    }
}
