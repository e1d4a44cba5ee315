use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 15;

/// Normalized Tadawul ticker.
///
/// Tickers are kept as text: `"2222"` and `"0100"` are symbols, not numbers,
/// and leading characters must survive joins against the local dataset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a symbol to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        for (index, ch) in normalized.chars().enumerate() {
            let valid = ch.is_ascii_alphanumeric() || ch == '.' || ch == '-';
            if !valid {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Comma-joined list used by the batch quote endpoint.
    pub fn join(symbols: &[Symbol]) -> String {
        symbols
            .iter()
            .map(Symbol::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

/// Upstream payloads are not consistent about ticker type; accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSymbol {
    Text(String),
    Integer(u64),
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = match RawSymbol::deserialize(deserializer)? {
            RawSymbol::Text(text) => text,
            RawSymbol::Integer(number) => number.to_string(),
        };
        Self::parse(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_leading_zeros() {
        let parsed = Symbol::parse(" 0100 ").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "0100");
    }

    #[test]
    fn normalizes_case() {
        assert_eq!(Symbol::parse("tasi").expect("valid").as_str(), "TASI");
    }

    #[test]
    fn rejects_invalid_chars() {
        let err = Symbol::parse("2222$").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolInvalidChar { ch: '$', index: 4 }));
    }

    #[test]
    fn deserializes_numeric_and_text_tickers() {
        let from_number: Symbol = serde_json::from_str("2222").expect("number");
        let from_text: Symbol = serde_json::from_str("\"2222\"").expect("text");
        assert_eq!(from_number, from_text);
    }

    #[test]
    fn joins_for_batch_requests() {
        let symbols = vec![
            Symbol::parse("2222").expect("valid"),
            Symbol::parse("1120").expect("valid"),
        ];
        assert_eq!(Symbol::join(&symbols), "2222,1120");
    }
}
