/// Amount the customer pays: product price plus shipping, both in cents.
/// Pix is charged the same total; the storefront's "5% off" badge is a label only.
pub fn checkout_total_cents(price_cents: i64, shipping_cents: i64) -> i64 {
    price_cents + shipping_cents
}

pub fn cents_to_amount(cents: i64) -> f64 {
    cents as f64 / 100.0
}

pub fn amount_to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Formats cents as Brazilian reais, e.g. `R$ 1.234,56`.
pub fn format_brl(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let units = (abs / 100).to_string();
    let fraction = abs % 100;

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{}R$ {},{:02}", sign, grouped, fraction)
}
