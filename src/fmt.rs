/// Group an integer with thousands separators: 1234567 -> "1,234,567".
pub fn number(val: i64) -> String {
    if val < 0 {
        format!("-{}", group(val.unsigned_abs()))
    } else {
        group(val.unsigned_abs())
    }
}

fn group(n: u64) -> String {
    let digits = n.to_string();
    let mut with_commas = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    with_commas.chars().rev().collect()
}

/// Format whole currency units with a symbol: ¥1,234. Sign goes before the symbol.
pub fn money(val: i64, symbol: &str) -> String {
    if val < 0 {
        format!("-{symbol}{}", group(val.unsigned_abs()))
    } else {
        format!("{symbol}{}", group(val.unsigned_abs()))
    }
}

pub fn percent(pct: f64) -> String {
    format!("{pct:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234, "¥"), "¥1,234");
        assert_eq!(money(-500, "¥"), "-¥500");
        assert_eq!(money(0, "$"), "$0");
        assert_eq!(money(1_000_000, "¥"), "¥1,000,000");
        assert_eq!(money(999, "¥"), "¥999");
    }

    #[test]
    fn test_number_and_percent() {
        assert_eq!(number(1000), "1,000");
        assert_eq!(number(-12345), "-12,345");
        assert_eq!(percent(75.0), "75.0%");
        assert_eq!(percent(33.333), "33.3%");
    }
}
