use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("Currency table format error: {0}")]
    CurrencyTableError(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

/// Problems found while evaluating an expression. None of them stop evaluation;
/// they are collected and shown to the user once the value is committed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    #[error("Empty factor.")]
    EmptyFactor,

    #[error("Empty denominator.")]
    EmptyDenominator,

    #[error("Division by zero.")]
    DivisionByZero,

    #[error("Empty base.")]
    EmptyBase,

    #[error("Empty exponent.")]
    EmptyExponent,

    #[error("Unknown or ambiguous currency, or unrecognized characters, in expression: {0}.")]
    UnknownCurrency(String),

    #[error("Unrecognized characters in expression.")]
    UnrecognizedCharacters,

    #[error("Expression is too complex.")]
    TooComplex,
}
