//! Terminal formatting for amounts, distances and percentages.

use motocash_core::Money;

/// Locale-ish money formatting.
///
/// ## Example
/// ```rust
/// use motocash_cli::format::MoneyFormat;
/// use motocash_core::Money;
///
/// let brl = MoneyFormat::new("R$", true);
/// assert_eq!(brl.money(Money::from_cents(123_456)), "R$ 1.234,56");
/// assert_eq!(brl.money(Money::from_cents(-550)), "-R$ 5,50");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    symbol: String,
    decimal: char,
    thousands: char,
}

impl MoneyFormat {
    pub fn new(symbol: &str, decimal_comma: bool) -> Self {
        let (decimal, thousands) = if decimal_comma { (',', '.') } else { ('.', ',') };
        MoneyFormat {
            symbol: symbol.to_string(),
            decimal,
            thousands,
        }
    }

    pub fn money(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        let cents = amount.cents().unsigned_abs();
        format!(
            "{}{} {}{}{:02}",
            sign,
            self.symbol,
            group_thousands(cents / 100, self.thousands),
            self.decimal,
            cents % 100
        )
    }

    /// Fixed-point number with the configured decimal separator.
    pub fn number(&self, value: f64, decimals: usize) -> String {
        let text = format!("{:.*}", decimals, value);
        if self.decimal == '.' {
            text
        } else {
            text.replace('.', &self.decimal.to_string())
        }
    }

    pub fn km(&self, value: f64) -> String {
        format!("{} km", self.number(value, 1))
    }

    pub fn percent(&self, value: f64) -> String {
        format!("{}%", self.number(value, 1))
    }
}

impl Default for MoneyFormat {
    fn default() -> Self {
        MoneyFormat::new("R$", true)
    }
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
