// Loader for the semicolon-separated currency table
// Header: Code;Symbol;Precedes;Decimals;Rate
// Example row: USD;$;true;2;1.0856
use csv::{ReaderBuilder, StringRecord, Trim};
use shared::models::Currency;
use std::io::Read;

use crate::error::EngineError;

const BUNDLED_TABLE: &str = include_str!("../../assets/currencies.csv");

pub struct CurrencyTableParser;

impl CurrencyTableParser {
    pub fn load_bundled() -> Result<Vec<Currency>, EngineError> {
        Self::load_currencies(BUNDLED_TABLE.as_bytes())
    }

    pub fn load_currencies<R: Read>(reader: R) -> Result<Vec<Currency>, EngineError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut currencies = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result?;

            let code = Self::required_field(&record, &headers, "Code", line)?;
            if code.is_empty() {
                return Err(EngineError::CurrencyTableError(format!("Empty 'Code' field at line {}", line)));
            }
            let symbol = Self::get_field(&record, &headers, "Symbol").unwrap_or("");
            let precedes = Self::parse_flag(Self::required_field(&record, &headers, "Precedes", line)?)
                .ok_or_else(|| EngineError::CurrencyTableError(format!("Error parsing 'Precedes' at line {}", line)))?;
            let decimals = Self::required_field(&record, &headers, "Decimals", line)?
                .parse::<u32>()
                .map_err(|e| EngineError::CurrencyTableError(format!("Error parsing 'Decimals' at line {}: {}", line, e)))?;
            let rate = Self::required_field(&record, &headers, "Rate", line)?
                .parse::<f64>()
                .map_err(|e| EngineError::CurrencyTableError(format!("Error parsing 'Rate' at line {}: {}", line, e)))?;
            if !(rate.is_finite() && rate > 0.0) {
                return Err(EngineError::CurrencyTableError(format!(
                    "'Rate' must be positive at line {}, got {}",
                    line, rate
                )));
            }

            currencies.push(Currency::new(code, symbol, precedes, decimals, rate));
        }

        tracing::debug!(count = currencies.len(), "Loaded currency table");
        Ok(currencies)
    }

    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header == name)
            .and_then(|pos| record.get(pos))
    }

    fn required_field<'a>(
        record: &'a StringRecord,
        headers: &StringRecord,
        name: &str,
        line: usize,
    ) -> Result<&'a str, EngineError> {
        Self::get_field(record, headers, name)
            .ok_or_else(|| EngineError::CurrencyTableError(format!("Missing '{}' field at line {}", name, line)))
    }

    fn parse_flag(s: &str) -> Option<bool> {
        match s.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_bundled_table() {
        let currencies = CurrencyTableParser::load_bundled().unwrap();
        let eur = currencies.iter().find(|c| c.code == "EUR").unwrap();
        assert_eq!(eur.symbol, "€");
        assert!(!eur.symbol_precedes);
        assert_eq!(eur.rate, 1.0);

        let jpy = currencies.iter().find(|c| c.code == "JPY").unwrap();
        assert_eq!(jpy.fractional_digits, 0);

        let xau = currencies.iter().find(|c| c.code == "XAU").unwrap();
        assert!(xau.symbol.is_empty());
    }

    #[test]
    fn test_load_currencies_valid_data() {
        let table = "\
Code;Symbol;Precedes;Decimals;Rate
EUR;€;false;2;1.0
USD; $ ;TRUE;2;1.25";
        let currencies = CurrencyTableParser::load_currencies(table.as_bytes()).unwrap();
        assert_eq!(currencies.len(), 2);
        assert_eq!(currencies[1], Currency::new("USD", "$", true, 2, 1.25));
    }

    #[test]
    fn test_columns_are_found_by_header_name() {
        let table = "\
Rate;Decimals;Code;Precedes;Symbol
10.5;2;SEK;0;kr";
        let currencies = CurrencyTableParser::load_currencies(table.as_bytes()).unwrap();
        assert_eq!(currencies[0], Currency::new("SEK", "kr", false, 2, 10.5));
    }

    #[test]
    fn test_load_currencies_header_only() {
        let table = "Code;Symbol;Precedes;Decimals;Rate";
        assert!(CurrencyTableParser::load_currencies(table.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_field() {
        let table = "\
Code;Symbol;Precedes;Decimals
EUR;€;false;2";
        let err = CurrencyTableParser::load_currencies(table.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Missing 'Rate' field at line 2"));
    }

    #[test]
    fn test_invalid_rate() {
        let table = "\
Code;Symbol;Precedes;Decimals;Rate
EUR;€;false;2;abc
USD;$;true;2;0";
        let err = CurrencyTableParser::load_currencies(table.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Error parsing 'Rate' at line 2"));

        let table = "\
Code;Symbol;Precedes;Decimals;Rate
USD;$;true;2;0";
        let err = CurrencyTableParser::load_currencies(table.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn test_invalid_flag() {
        let table = "\
Code;Symbol;Precedes;Decimals;Rate
EUR;€;maybe;2;1";
        let err = CurrencyTableParser::load_currencies(table.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Error parsing 'Precedes'"));
    }
}
