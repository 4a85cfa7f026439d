// ---------------------------------------------------------------------------
// Display formatting for metrics (pt-BR, matching the source data's locale)
// ---------------------------------------------------------------------------

/// Currency display, rounded to whole reais: `R$ 1.234.567`.
pub fn format_brl(value: f64) -> String {
    format!("R$ {}", group_thousands(value.round() as i64))
}

/// Percentage display with one decimal and a decimal comma: `4,3%`.
pub fn format_pct(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0).replace('.', ",")
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
