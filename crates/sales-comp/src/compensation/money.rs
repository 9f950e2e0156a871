use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Monetary amounts are exact decimals; payouts never pass through binary floats.
pub type Money = Decimal;

/// Largest amount accepted at any boundary (one trillion).
///
/// Keeps every product and sum the engine computes far inside `Decimal`'s range.
pub const MAX_AMOUNT: Money = dec!(1_000_000_000_000);

/// Rounds an amount to cents, half away from zero.
pub fn round_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Locale convention used to render amounts for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub thousands_separator: char,
    pub decimal_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::brl()
    }
}

impl CurrencyFormat {
    /// Brazilian real: `R$ 1.234,56`.
    pub fn brl() -> Self {
        Self {
            symbol: "R$".to_string(),
            thousands_separator: '.',
            decimal_separator: ',',
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    pub fn format(&self, amount: Money) -> String {
        let rounded = round_cents(amount);
        let sign = if rounded < Decimal::ZERO { "-" } else { "" };
        let fixed = format!("{:.2}", rounded.abs());
        let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        format!(
            "{} {}{}{}{}",
            self.symbol,
            sign,
            group_thousands(integer, self.thousands_separator),
            self.decimal_separator,
            fraction
        )
    }

    pub fn parse(&self, text: &str) -> Result<Money, CurrencyParseError> {
        let trimmed = text.trim();
        let unprefixed = trimmed
            .strip_prefix(self.symbol.as_str())
            .unwrap_or(trimmed)
            .trim();
        if unprefixed.is_empty() {
            return Err(CurrencyParseError::Empty);
        }

        let normalized: String = unprefixed
            .chars()
            .filter(|ch| *ch != self.thousands_separator && !ch.is_whitespace())
            .map(|ch| if ch == self.decimal_separator { '.' } else { ch })
            .collect();

        Decimal::from_str(&normalized)
            .map(round_cents)
            .map_err(|source| CurrencyParseError::Invalid {
                input: text.to_string(),
                source,
            })
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Renders an amount with the default `R$` convention.
pub fn format_currency(amount: Money) -> String {
    CurrencyFormat::default().format(amount)
}

/// Inverse of [`format_currency`].
pub fn parse_currency(text: &str) -> Result<Money, CurrencyParseError> {
    CurrencyFormat::default().parse(text)
}

/// Reads either a plain decimal (`45000.50`) or text in the given currency convention.
///
/// Plain decimals keep their full precision; formatted text is rounded to cents.
pub fn parse_amount(raw: &str, format: &CurrencyFormat) -> Result<Money, CurrencyParseError> {
    match Decimal::from_str(raw.trim()) {
        Ok(amount) => Ok(amount),
        Err(_) => format.parse(raw),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CurrencyParseError {
    #[error("currency text is empty")]
    Empty,
    #[error("'{input}' is not a valid currency amount")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn formats_with_grouping_and_two_decimals() {
        assert_eq!(format_currency(dec!(0)), "R$ 0,00");
        assert_eq!(format_currency(dec!(500)), "R$ 500,00");
        assert_eq!(format_currency(dec!(1600)), "R$ 1.600,00");
        assert_eq!(format_currency(dec!(110000)), "R$ 110.000,00");
        assert_eq!(format_currency(dec!(1234567.891)), "R$ 1.234.567,89");
    }

    #[test]
    fn parse_amount_accepts_plain_and_formatted_input() {
        let brl = CurrencyFormat::brl();
        assert_eq!(parse_amount(" 45000.50 ", &brl).unwrap(), dec!(45000.50));
        assert_eq!(
            parse_amount("29999.9999999999999", &brl).unwrap(),
            dec!(29999.9999999999999)
        );
        assert_eq!(parse_amount("R$ 1.234,56", &brl).unwrap(), dec!(1234.56));
        assert!(matches!(
            parse_amount("  ", &brl),
            Err(CurrencyParseError::Empty)
        ));
        assert!(matches!(
            parse_amount("forty", &brl),
            Err(CurrencyParseError::Invalid { .. })
        ));
    }

    #[test]
    fn negative_amounts_keep_sign_after_symbol() {
        assert_eq!(format_currency(dec!(-1500.5)), "R$ -1.500,50");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(format_currency(dec!(666.665)), "R$ 666,67");
        assert_eq!(format_currency(dec!(0.004)), "R$ 0,00");
    }

    #[test]
    fn parse_recovers_formatted_amounts() {
        for amount in [dec!(0), dec!(500), dec!(1600), dec!(110000), dec!(666.67)] {
            let text = format_currency(amount);
            let parsed = parse_currency(&text).expect("formatted text parses");
            assert_eq!(parsed, amount, "round trip of {text}");
        }
    }

    #[test]
    fn parse_accepts_missing_symbol_and_whitespace() {
        assert_eq!(parse_currency("  35.000,50 ").unwrap(), dec!(35000.50));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(parse_currency("R$ "), Err(CurrencyParseError::Empty)));
        assert!(matches!(
            parse_currency("R$ abc"),
            Err(CurrencyParseError::Invalid { .. })
        ));
    }

    #[test]
    fn custom_symbol_is_respected() {
        let format = CurrencyFormat::brl().with_symbol("BRL");
        assert_eq!(format.format(dec!(42)), "BRL 42,00");
        assert_eq!(format.parse("BRL 42,00").unwrap(), dec!(42));
    }
}
