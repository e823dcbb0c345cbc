//! Formatting helpers shared by the dashboard crates

use findash_config::{CurrencyConfig, SymbolPosition};
use rust_decimal::prelude::*;

/// Insert a separator every three digits of an integer string
fn group_digits(digits: &str, separator: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    let grouped: String = result.chars().rev().collect();
    format!("{}{}", sign, grouped)
}

/// Currency formatter.
///
/// Rounds half away from zero, so with the default (zero decimals)
/// `1000.50` renders as `$1,001` and `-1000` as `-$1,000`.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub decimal_places: u32,
    pub thousands_separator: String,
    pub decimal_separator: String,
    pub symbol_position: SymbolPosition,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::from(&CurrencyConfig::default())
    }
}

impl From<&CurrencyConfig> for CurrencyFormat {
    fn from(config: &CurrencyConfig) -> Self {
        Self {
            symbol: config.symbol.clone(),
            decimal_places: config.decimal_places,
            thousands_separator: config.thousands_separator.clone(),
            decimal_separator: config.decimal_separator.clone(),
            symbol_position: config.symbol_position,
        }
    }
}

impl CurrencyFormat {
    /// Format an amount. Non-finite input renders as `N/A`.
    pub fn format(&self, value: f64) -> String {
        let Some(amount) = Decimal::from_f64(value) else {
            return "N/A".to_string();
        };
        let rounded = amount.round_dp_with_strategy(
            self.decimal_places,
            RoundingStrategy::MidpointAwayFromZero,
        );
        let negative = rounded.is_sign_negative() && !rounded.is_zero();

        let plain = rounded.abs().to_string();
        let (int_part, frac_part) = match plain.split_once('.') {
            Some((i, f)) => (i.to_string(), f.to_string()),
            None => (plain, String::new()),
        };

        let mut body = group_digits(&int_part, &self.thousands_separator);
        if self.decimal_places > 0 {
            let mut frac = frac_part;
            while frac.len() < self.decimal_places as usize {
                frac.push('0');
            }
            body.push_str(&self.decimal_separator);
            body.push_str(&frac);
        }

        let sign = if negative { "-" } else { "" };
        match self.symbol_position {
            SymbolPosition::Before => format!("{}{}{}", sign, self.symbol, body),
            SymbolPosition::After => format!("{}{} {}", sign, body, self.symbol),
        }
    }

    /// Axis tick in thousands, e.g. `12500` -> `$12.5k`
    pub fn axis_thousands(&self, value: f64) -> String {
        let thousands = value / 1000.0;
        // avoid "-0"
        let thousands = if thousands == 0.0 { 0.0 } else { thousands };
        match self.symbol_position {
            SymbolPosition::Before => format!("{}{}k", self.symbol, thousands),
            SymbolPosition::After => format!("{}k {}", thousands, self.symbol),
        }
    }
}

/// Format a number as US-dollar currency without decimals
pub fn format_currency(value: f64) -> String {
    CurrencyFormat::default().format(value)
}

/// Axis tick label in thousands of dollars
pub fn format_axis_thousands(value: f64) -> String {
    CurrencyFormat::default().axis_thousands(value)
}

/// Share (0..=1) as a percentage with one decimal, e.g. `0.523` -> `52.3%`
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Escape text for safe inclusion in HTML and SVG output
pub fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
