// Number and label formatting shared by cards, tables and hover text

/// `1234567` → `"1,234,567"`
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `1234567` → `"$1,234,567"`
pub fn currency(value: u64) -> String {
    format!("${}", thousands(value))
}

/// Rounded to whole dollars / whole people
pub fn currency_f64(value: f64) -> String {
    currency(round_non_negative(value))
}

pub fn count_f64(value: f64) -> String {
    thousands(round_non_negative(value))
}

fn round_non_negative(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// `part / whole`, or 0 when there is nothing to divide by
pub fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Whole-number percentage, e.g. `"75%"`
pub fn percent(part: u64, whole: u64) -> String {
    format!("{:.0}%", ratio(part, whole) * 100.0)
}

/// `2022` → `"FY22"`
pub fn fiscal_year(year: u16) -> String {
    format!("FY{:02}", year % 100)
}

/// `FY22` for a selected year, `FY10-FY22` across the whole table
pub fn fiscal_year_label(year: Option<u16>, bounds: (u16, u16)) -> String {
    match year {
        Some(y) => fiscal_year(y),
        None => format!("{}-{}", fiscal_year(bounds.0), fiscal_year(bounds.1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
        assert_eq!(currency(1700000000), "$1,700,000,000");
    }

    #[test]
    fn test_float_rounding() {
        assert_eq!(currency_f64(1234.5), "$1,235");
        assert_eq!(count_f64(f64::NAN), "0");
        assert_eq!(count_f64(-3.0), "0");
    }

    #[test]
    fn test_percent_guards_zero() {
        assert_eq!(percent(1, 4), "25%");
        assert_eq!(percent(5, 0), "0%");
    }

    #[test]
    fn test_fiscal_year_labels() {
        assert_eq!(fiscal_year(2009), "FY09");
        assert_eq!(fiscal_year_label(Some(2022), (2010, 2022)), "FY22");
        assert_eq!(fiscal_year_label(None, (2010, 2022)), "FY10-FY22");
    }
}
