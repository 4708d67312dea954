// Currency registry: the budget-side collaborator the value edit looks currencies up in
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use shared::models::Currency;
use std::fmt;

use super::currency_table::CurrencyTableParser;
use crate::error::EngineError;

/// Lookup and conversion services needed by the evaluator and the value edit.
pub trait CurrencySource: fmt::Debug + Send + Sync {
    fn find_currency(&self, code: &str) -> Option<&Currency>;

    /// Finds the single currency using `symbol`. Ambiguous symbols resolve to nothing.
    fn find_currency_symbol(&self, symbol: &str, fuzzy: bool) -> Option<&Currency>;

    fn default_currency(&self) -> &Currency;

    fn convert(&self, amount: f64, from: &Currency, to: &Currency) -> f64 {
        from.convert_to(amount, to)
    }
}

#[derive(Debug, Clone)]
pub struct CurrencyRegistry {
    currencies: Vec<Currency>,
    default_index: usize,
}

impl CurrencyRegistry {
    pub fn new(currencies: Vec<Currency>, default_code: &str) -> Result<Self, EngineError> {
        let default_index = currencies
            .iter()
            .position(|c| c.code == default_code)
            .ok_or_else(|| EngineError::UnknownCurrency(default_code.to_string()))?;
        Ok(Self {
            currencies,
            default_index,
        })
    }

    pub fn bundled(default_code: &str) -> Result<Self, EngineError> {
        let registry = Self::new(CurrencyTableParser::load_bundled()?, default_code)?;
        tracing::info!(
            currencies = registry.currencies.len(),
            default = %default_code,
            "Currency registry loaded from bundled table"
        );
        Ok(registry)
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    /// Adds a currency, replacing any existing entry with the same code.
    pub fn add_currency(&mut self, currency: Currency) {
        match self.currencies.iter_mut().find(|c| c.code == currency.code) {
            Some(existing) => *existing = currency,
            None => self.currencies.push(currency),
        }
    }

    pub fn set_default_currency(&mut self, code: &str) -> Result<(), EngineError> {
        self.default_index = self
            .currencies
            .iter()
            .position(|c| c.code == code)
            .ok_or_else(|| EngineError::UnknownCurrency(code.to_string()))?;
        Ok(())
    }

    fn unique<'a, I>(mut matches: I) -> Result<Option<&'a Currency>, ()>
    where
        I: Iterator<Item = &'a Currency>,
    {
        match (matches.next(), matches.next()) {
            (None, _) => Ok(None),
            (Some(found), None) => Ok(Some(found)),
            (Some(_), Some(_)) => Err(()),
        }
    }
}

impl CurrencySource for CurrencyRegistry {
    fn find_currency(&self, code: &str) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.code == code)
    }

    fn find_currency_symbol(&self, symbol: &str, fuzzy: bool) -> Option<&Currency> {
        if symbol.is_empty() {
            return None;
        }
        let with_symbol = || self.currencies.iter().filter(|c| !c.symbol.is_empty());

        match Self::unique(with_symbol().filter(|c| c.symbol == symbol)) {
            Ok(Some(found)) => return Some(found),
            Ok(None) => {}
            Err(()) => return None,
        }
        if !fuzzy {
            return None;
        }

        let lowered = symbol.to_lowercase();
        match Self::unique(with_symbol().filter(|c| c.symbol.to_lowercase() == lowered)) {
            Ok(Some(found)) => return Some(found),
            Ok(None) => {}
            Err(()) => return None,
        }

        let matcher = SkimMatcherV2::default();
        let mut best: Option<(i64, &Currency)> = None;
        let mut tied = false;
        for currency in with_symbol() {
            let Some(score) = matcher.fuzzy_match(&currency.symbol, symbol) else {
                continue;
            };
            match best {
                Some((best_score, _)) if score < best_score => {}
                Some((best_score, _)) if score == best_score => tied = true,
                _ => {
                    best = Some((score, currency));
                    tied = false;
                }
            }
        }
        if tied {
            return None;
        }
        best.map(|(_, currency)| currency)
    }

    fn default_currency(&self) -> &Currency {
        &self.currencies[self.default_index]
    }
}
