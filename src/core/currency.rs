use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies the salon reports in, with their display conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Colombian Peso, es-CO grouping (`$ 1.234.567,5`)
    COP,
    /// US Dollar, en-US grouping (`$1,234,567.5`)
    USD,
}

impl Currency {
    /// Maximum number of fraction digits stored and displayed
    pub fn scale(&self) -> u32 {
        2
    }

    /// Rounds a decimal value to the appropriate scale for this currency
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp(self.scale())
    }

    /// Validates that a money amount is non-negative and within scale
    pub fn validate_amount(&self, amount: Decimal) -> Result<(), String> {
        if amount.normalize().scale() > self.scale() {
            return Err(format!(
                "{} amounts must have at most {} decimal places, got {}",
                self,
                self.scale(),
                amount.normalize().scale()
            ));
        }

        if amount < Decimal::ZERO {
            return Err(format!("{} amount cannot be negative", self));
        }

        Ok(())
    }

    fn separators(&self) -> (char, char) {
        match self {
            Currency::COP => ('.', ','),
            Currency::USD => (',', '.'),
        }
    }

    /// Formats an amount with locale grouping, 0 to 2 fraction digits
    pub fn format_amount(&self, amount: Decimal) -> String {
        let (group_sep, decimal_sep) = self.separators();
        let rounded = self.round(amount).normalize();
        let digits = rounded.abs().to_string();
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i.to_string(), Some(f.to_string())),
            None => (digits, None),
        };

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (idx, ch) in int_part.chars().enumerate() {
            if idx > 0 && (int_part.len() - idx) % 3 == 0 {
                grouped.push(group_sep);
            }
            grouped.push(ch);
        }
        if let Some(frac) = frac_part {
            grouped.push(decimal_sep);
            grouped.push_str(&frac);
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        match self {
            Currency::COP => format!("{}$ {}", sign, grouped),
            Currency::USD => format!("{}${}", sign, grouped),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::COP => write!(f, "COP"),
            Currency::USD => write!(f, "USD"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "COP" => Ok(Currency::COP),
            "USD" => Ok(Currency::USD),
            _ => Err(format!("Invalid currency: {}", s)),
        }
    }
}
