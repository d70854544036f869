/// Insert thousands separators into the integer part of an already formatted number.
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.find('.') {
        Some(idx) => unsigned.split_at(idx),
        None => (unsigned, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}{}", sign, grouped, frac_part)
}

/// Returns "1,234.56", or "n/a" for an undefined cell.
pub fn format_amount(value: Option<f64>) -> String {
    match value {
        Some(v) => group_thousands(&format!("{:.2}", v)),
        None => "n/a".to_string(),
    }
}

/// Returns "$1,234.56".
pub fn format_money(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", group_thousands(&format!("{:.2}", -value)))
    } else {
        format!("${}", group_thousands(&format!("{:.2}", value)))
    }
}

/// Returns "+12.34%", "-5.00%" or "n/a".
pub fn format_change(change: Option<f64>) -> String {
    match change {
        Some(c) if c > 0.0 => format!("+{:.2}%", c),
        Some(c) => format!("{:.2}%", c),
        None => "n/a".to_string(),
    }
}

/// Returns "500 GB" for whole sizes, "1.5 GB" otherwise.
pub fn format_size_gb(size: f64) -> String {
    if size.fract() == 0.0 {
        format!("{} GB", group_thousands(&format!("{:.0}", size)))
    } else {
        format!("{} GB", group_thousands(&format!("{:.1}", size)))
    }
}

/// Returns "1 snapshot" / "3 snapshots".
pub fn pluralize(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_amount_groups_and_rounds() {
        assert_eq!(format_amount(Some(1234.5)), "1,234.50");
        assert_eq!(format_amount(Some(0.0)), "0.00");
        assert_eq!(format_amount(Some(999.999)), "1,000.00");
        assert_eq!(format_amount(Some(-1234567.891)), "-1,234,567.89");
        assert_eq!(format_amount(None), "n/a");
    }

    #[test]
    fn format_money_dollars() {
        assert_eq!(format_money(20.0), "$20.00");
        assert_eq!(format_money(12345.678), "$12,345.68");
        assert_eq!(format_money(-3.5), "-$3.50");
    }

    #[test]
    fn format_change_signs() {
        assert_eq!(format_change(Some(12.346)), "+12.35%");
        assert_eq!(format_change(Some(-5.0)), "-5.00%");
        assert_eq!(format_change(Some(0.0)), "0.00%");
        assert_eq!(format_change(None), "n/a");
    }

    #[test]
    fn format_size_whole_and_fractional() {
        assert_eq!(format_size_gb(500.0), "500 GB");
        assert_eq!(format_size_gb(16384.0), "16,384 GB");
        assert_eq!(format_size_gb(1.5), "1.5 GB");
    }

    #[test]
    fn pluralize_counts() {
        assert_eq!(pluralize(1, "snapshot"), "1 snapshot");
        assert_eq!(pluralize(0, "snapshot"), "0 snapshots");
        assert_eq!(pluralize(3, "bucket"), "3 buckets");
    }
}
