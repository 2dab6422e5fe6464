/// Pick the Russian plural form for `count`: `one` for 1, 21, 101...,
/// `few` for 2-4, 22-24..., `many` for everything else including 11-14.
pub fn plural_form<'a>(count: u64, one: &'a str, few: &'a str, many: &'a str) -> &'a str {
    let last_two = count % 100;
    let last = count % 10;
    if (11..=14).contains(&last_two) {
        many
    } else if last == 1 {
        one
    } else if (2..=4).contains(&last) {
        few
    } else {
        many
    }
}

/// "Предмет" / "Предмета" / "Предметов" for an item count.
pub fn item_label(count: u64) -> &'static str {
    plural_form(count, "Предмет", "Предмета", "Предметов")
}

/// Format a balance with space-separated thousands, e.g. 1 250 000
pub fn format_balance(balance: u64) -> String {
    let digits = balance.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_label() {
        assert_eq!(item_label(1), "Предмет");
        for n in 2..=4 {
            assert_eq!(item_label(n), "Предмета");
        }
        for n in 5..=20 {
            assert_eq!(item_label(n), "Предметов");
        }
        assert_eq!(item_label(21), "Предмет");
        assert_eq!(item_label(0), "Предметов");
    }

    #[test]
    fn test_item_label_teens_ignore_hundreds() {
        for n in [11, 12, 13, 14, 111, 112, 211, 1014] {
            assert_eq!(item_label(n), "Предметов", "count {}", n);
        }
        assert_eq!(item_label(101), "Предмет");
        assert_eq!(item_label(122), "Предмета");
    }

    #[test]
    fn test_format_balance() {
        assert_eq!(format_balance(0), "0");
        assert_eq!(format_balance(999), "999");
        assert_eq!(format_balance(1000), "1 000");
        assert_eq!(format_balance(1250000), "1 250 000");
    }
}
