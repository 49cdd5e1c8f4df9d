use std::fmt;

use serde::{Deserialize, Serialize};

/// Display currency. Only affects formatting; the calculators are currency-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cad,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Cad,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Cad => "CAD",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
            Currency::Cad => "C$",
        }
    }

    /// `1234.5` with two decimals in USD is `$1,234.50`.
    pub fn format_amount(self, value: f64, decimals: usize) -> String {
        if !value.is_finite() {
            return format!("{}{value}", self.symbol());
        }
        let fixed = format!("{:.*}", decimals, value.abs());
        let (whole, fraction) = match fixed.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (fixed.as_str(), None),
        };

        let is_zero = fixed.bytes().all(|b| b == b'0' || b == b'.');
        let sign = if value < 0.0 && !is_zero { "-" } else { "" };
        let mut out = format!("{sign}{}{}", self.symbol(), group_thousands(whole));
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }

    /// Short axis label: `$1.2M`, `$45K`, or the whole amount below a thousand.
    /// Thresholds sit where rounding would carry into the next suffix, so
    /// 999,999 reads `$1.0M` rather than `$1000K`.
    pub fn format_compact(self, value: f64) -> String {
        let symbol = self.symbol();
        if value >= 999_500.0 {
            format!("{symbol}{:.1}M", value / 1_000_000.0)
        } else if value >= 999.5 {
            format!("{symbol}{:.0}K", value / 1_000.0)
        } else {
            self.format_amount(value, 0)
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
