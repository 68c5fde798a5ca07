//! Display formatting for amounts and months.

use rust_decimal::Decimal;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English name of a month number (1-12); empty for anything else.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index as usize))
        .copied()
        .unwrap_or("")
}

/// Formats an amount with exactly two decimals, e.g. `2300.00`.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

/// Formats a total with thousands grouping and at most three decimals,
/// e.g. `4,100` or `1,237.5`.
///
/// # Examples
///
/// ```
/// use shift_ledger::calculation::format_grouped;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_grouped(Decimal::new(4100, 0)), "4,100");
/// assert_eq!(format_grouped(Decimal::new(-12375, 1)), "-1,237.5");
/// ```
pub fn format_grouped(amount: Decimal) -> String {
    let rounded = amount.round_dp(3).normalize();
    let text = rounded.abs().to_string();
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + integer.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
