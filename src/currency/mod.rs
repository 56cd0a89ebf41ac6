//! Amount formatting. Currency is a display label only; nothing is converted.

use serde::{Deserialize, Serialize};

/// ISO 4217 currency code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn symbol(&self) -> String {
        symbol_for(self.as_str())
    }

    pub fn minor_units(&self) -> u8 {
        minor_units_for(self.as_str())
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

/// Separators used when rendering numbers for a language tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

impl LocaleConfig {
    /// Separators for a BCP 47 tag; unknown tags fall back to `en-US` punctuation.
    pub fn for_tag(tag: &str) -> Self {
        let language = tag
            .split(|ch: char| ch == '-' || ch == '_')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let (decimal_separator, grouping_separator) = match language.as_str() {
            "pt" | "es" | "it" | "de" | "nl" | "id" | "tr" => (',', '.'),
            "fr" | "sv" | "nb" | "fi" | "pl" | "cs" | "ru" | "uk" => (',', ' '),
            _ => ('.', ','),
        };
        Self {
            language_tag: tag.to_string(),
            decimal_separator,
            grouping_separator,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CurrencyDisplay {
    #[default]
    Symbol,
    Code,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum NegativeStyle {
    #[default]
    Sign,
    Parentheses,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormatOptions {
    pub currency_display: CurrencyDisplay,
    pub negative_style: NegativeStyle,
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "BRL" => "R$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        "CAD" => "C$".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" | "KRW" | "CLP" => 0,
        "KWD" | "BHD" | "OMR" => 3,
        _ => 2,
    }
}

/// Renders `value` with `precision` decimals and the locale's separators.
pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let fixed = format!("{:.*}", precision as usize, value.abs());
    let (int_part, fraction) = match fixed.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut body = group_digits(int_part, locale.grouping_separator);
    if let Some(fraction) = fraction {
        body.push(locale.decimal_separator);
        body.push_str(fraction);
    }
    // "-0.00" reads as a negative zero; only signal a sign when a digit survives rounding.
    if value < 0.0 && body.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
        body.insert(0, '-');
    }
    body
}

fn group_digits(digits: &str, separator: char) -> String {
    let count = digits.chars().count();
    let mut grouped = String::with_capacity(count + count / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (count - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats an amount with its currency symbol and minor units.
pub fn format_amount(amount: f64, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    format_amount_with(amount, code, locale, &FormatOptions::default())
}

pub fn format_amount_with(
    amount: f64,
    code: &CurrencyCode,
    locale: &LocaleConfig,
    options: &FormatOptions,
) -> String {
    let number = format_number(locale, amount, code.minor_units());
    let (negative, digits) = match number.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, number.as_str()),
    };
    let labelled = match options.currency_display {
        CurrencyDisplay::Symbol => format!("{}{}", code.symbol(), digits),
        CurrencyDisplay::Code => format!("{} {}", code.as_str(), digits),
    };
    match (negative, options.negative_style) {
        (false, _) => labelled,
        (true, NegativeStyle::Sign) => format!("-{labelled}"),
        (true, NegativeStyle::Parentheses) => format!("({labelled})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_for_us_locale() {
        let locale = LocaleConfig::default();
        assert_eq!(format_number(&locale, 1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(&locale, 999.0, 0), "999");
        assert_eq!(format_number(&locale, -1000.5, 1), "-1,000.5");
    }

    #[test]
    fn negative_zero_is_not_signed() {
        assert_eq!(format_number(&LocaleConfig::default(), -0.001, 2), "0.00");
    }

    #[test]
    fn brazilian_locale_swaps_separators() {
        let locale = LocaleConfig::for_tag("pt-BR");
        let code = CurrencyCode::new("brl");
        assert_eq!(format_amount(1500.25, &code, &locale), "R$1.500,25");
    }

    #[test]
    fn minor_units_follow_currency() {
        let locale = LocaleConfig::default();
        assert_eq!(format_amount(1500.4, &CurrencyCode::new("JPY"), &locale), "¥1,500");
        assert_eq!(format_amount(2.5, &CurrencyCode::new("KWD"), &locale), "KWD2.500");
    }

    #[test]
    fn negative_styles() {
        let locale = LocaleConfig::default();
        let code = CurrencyCode::default();
        let parentheses = FormatOptions {
            negative_style: NegativeStyle::Parentheses,
            ..FormatOptions::default()
        };
        assert_eq!(format_amount(-12.0, &code, &locale), "-$12.00");
        assert_eq!(format_amount_with(-12.0, &code, &locale, &parentheses), "($12.00)");
        let by_code = FormatOptions {
            currency_display: CurrencyDisplay::Code,
            ..FormatOptions::default()
        };
        assert_eq!(format_amount_with(12.0, &code, &locale, &by_code), "USD 12.00");
    }
}
