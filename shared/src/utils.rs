// Locale-aware number handling shared across the engine and the GUI.
// The evaluator only ever sees canonical ASCII syntax ('.', '-', '+', '%');
// NumberLocale translates between that form and the glyphs a user types or reads.
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberLocale {
    pub decimal_separator: char,
    pub group_separator: char,
    pub negative_sign: char,
    pub positive_sign: char,
    pub percent: char,
    /// Shown as an affix when no currency registry is attached to a value edit.
    pub currency_symbol: String,
    pub currency_precedes: bool,
}

impl NumberLocale {
    pub fn en_us() -> Self {
        Self {
            decimal_separator: '.',
            group_separator: ',',
            negative_sign: '-',
            positive_sign: '+',
            percent: '%',
            currency_symbol: "$".to_string(),
            currency_precedes: true,
        }
    }

    // "1.234,56"
    pub fn pt_br() -> Self {
        Self {
            decimal_separator: ',',
            group_separator: '.',
            negative_sign: '-',
            positive_sign: '+',
            percent: '%',
            currency_symbol: "R$".to_string(),
            currency_precedes: true,
        }
    }

    pub fn de_de() -> Self {
        Self {
            decimal_separator: ',',
            group_separator: '.',
            negative_sign: '-',
            positive_sign: '+',
            percent: '%',
            currency_symbol: "€".to_string(),
            currency_precedes: false,
        }
    }

    pub fn to_canonical(&self, s: &str) -> String {
        s.chars()
            .map(|c| {
                if c == self.decimal_separator {
                    '.'
                } else if c == self.negative_sign {
                    '-'
                } else if c == self.positive_sign {
                    '+'
                } else if c == self.percent {
                    '%'
                } else {
                    c
                }
            })
            .collect()
    }

    pub fn from_canonical(&self, s: &str) -> String {
        s.chars()
            .map(|c| match c {
                '.' => self.decimal_separator,
                '-' => self.negative_sign,
                '+' => self.positive_sign,
                '%' => self.percent,
                other => other,
            })
            .collect()
    }

    /// Removes group separators and every whitespace character.
    pub fn strip_grouping(&self, s: &str) -> String {
        s.chars()
            .filter(|&c| c != self.group_separator && !c.is_whitespace())
            .collect()
    }

    /// Fixed-point rendering with grouped integer digits, e.g. `1,234.50` or `1.234,50`.
    pub fn format_decimal(&self, value: f64, decimals: u32) -> String {
        let value = if value.is_finite() { value } else { 0.0 };
        let mut canonical = format!("{:.*}", decimals as usize, value.abs());
        // No sign for values that round to zero
        if value < 0.0 && canonical.chars().any(|c| c.is_ascii_digit() && c != '0') {
            canonical.insert(0, '-');
        }

        let localized = self.from_canonical(&canonical);
        let (sign, unsigned) = match localized.strip_prefix(self.negative_sign) {
            Some(rest) => (Some(self.negative_sign), rest),
            None => (None, localized.as_str()),
        };
        let (int_part, frac_part) = match unsigned.split_once(self.decimal_separator) {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (unsigned, None),
        };

        let mut out = String::with_capacity(localized.len() + localized.len() / 3);
        out.extend(sign);
        out.push_str(&self.group_digits(int_part));
        if let Some(frac_part) = frac_part {
            out.push(self.decimal_separator);
            out.push_str(frac_part);
        }
        out
    }

    pub fn format_integer(&self, value: i64) -> String {
        let digits = value.unsigned_abs().to_string();
        if value < 0 {
            format!("{}{}", self.negative_sign, self.group_digits(&digits))
        } else {
            self.group_digits(&digits)
        }
    }

    pub fn parse_decimal(&self, s: &str) -> Result<f64> {
        let canonical = self.to_canonical(&self.strip_grouping(s));
        if canonical.is_empty() {
            return Err(anyhow!("Failed to parse decimal '{}': empty input", s));
        }
        let value = f64::from_str(&canonical)
            .map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))?;
        if !value.is_finite() {
            return Err(anyhow!("Failed to parse decimal '{}': not a finite number", s));
        }
        Ok(value)
    }

    fn group_digits(&self, digits: &str) -> String {
        let len = digits.len();
        let mut out = String::with_capacity(len + len / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(self.group_separator);
            }
            out.push(c);
        }
        out
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::en_us()
    }
}
