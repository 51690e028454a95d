use rust_decimal::prelude::*;

use crate::filter::FilteredView;

/// Sum of `amount` over the view, zero when it is empty.
pub fn total(view: &FilteredView<'_>) -> Decimal {
    view.iter().map(|rec| *rec.amount()).sum()
}

/// Whole dollars with thousands separators, e.g. `$54,000`. Exact for any `Decimal`.
pub fn format_total(total: Decimal) -> String {
    let rounded = total.round_dp(0);
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}")
}
