use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};

const SCALE: i64 = 2;

/// Rounds to two decimals with halves going toward positive infinity.
///
/// The value is rounded from its shortest decimal text, so `1.005` becomes
/// `1.01` even though the nearest `f64` sits slightly below it.
pub fn round_number(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let Ok(decimal) = BigDecimal::from_str(&value.to_string()) else {
        return value;
    };
    let mode = if value < 0.0 {
        RoundingMode::HalfDown
    } else {
        RoundingMode::HalfUp
    };
    decimal
        .with_scale_round(SCALE, mode)
        .to_string()
        .parse()
        .unwrap_or(value)
}

/// Signed relative change of `new_value` against `old_value`, e.g. `+20%`.
pub fn percentage_string(new_value: f64, old_value: f64) -> String {
    if old_value == 0.0 || new_value == old_value {
        return "0.0%".to_string();
    }
    if new_value >= old_value {
        let change = round_number((new_value - old_value) / old_value * 100.0);
        return format!("+{}%", change);
    }
    let change = round_number((old_value - new_value) / old_value * 100.0);
    format!("-{}%", change)
}

/// Formats a monetary value with exactly two decimals.
pub fn format_money(value: f64) -> String {
    format!("{:.2}", value)
}
