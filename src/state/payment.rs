//! Derived payment figures for the action details step

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Price per additional share, in naira
pub fn unit_price() -> Decimal {
    Decimal::new(700, 2)
}

/// Parse a user-entered amount. Empty or malformed input yields `None`.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

/// Round to kobo precision
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Amount payable for additional shares.
///
/// `None` when the shareholder is not applying for additional shares or the
/// share count is not a non-negative number.
pub fn additional_amount(apply_additional: bool, additional_shares: &str) -> Option<Decimal> {
    if !apply_additional {
        return None;
    }
    let shares = parse_amount(additional_shares)?;
    if shares.is_sign_negative() && !shares.is_zero() {
        return None;
    }
    Some(round_money(shares * unit_price()))
}

/// Total payable: amount due plus additional amount, each defaulting to 0
pub fn total_payable(amount_due: &str, additional_amount: &str) -> Decimal {
    let due = parse_amount(amount_due).unwrap_or_default();
    let additional = parse_amount(additional_amount).unwrap_or_default();
    round_money(due + additional)
}

/// Wire format: plain two decimal places (`1700.00`)
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", round_money(value))
}

/// Display format: naira sign with thousands grouping (`₦1,700.00`)
pub fn format_naira(value: Decimal) -> String {
    let plain = format_amount(value.abs());
    let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}₦{grouped}.{fraction}")
}

/// Group an integer-like holding for display (`15000` -> `15,000`).
/// Values that are not plain numbers are returned unchanged.
pub fn format_units(raw: &str) -> String {
    match parse_amount(raw) {
        Some(value) if value.fract().is_zero() => {
            let naira = format_naira(value);
            naira
                .trim_start_matches('-')
                .trim_start_matches('₦')
                .trim_end_matches(".00")
                .to_string()
        }
        _ => raw.to_string(),
    }
}
