use cost_engine::round_display;

/// Whole-unit money with thousands separators, e.g. `$12,345`.
pub fn money(symbol: &str, value: f64) -> String {
    let rounded = round_display(value);
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded < 0 {
        format!("-{symbol}{grouped}")
    } else {
        format!("{symbol}{grouped}")
    }
}

/// Hours or other small quantities: integers without a trailing `.0`.
pub fn quantity(value: f64) -> String {
    if value == 0.0 {
        String::new()
    } else {
        value.to_string()
    }
}
