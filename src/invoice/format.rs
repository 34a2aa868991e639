//! Money, date and number-to-words formatting for the rendered invoice.
//!
//! Pure functions; the layout engine is their only consumer. Dates render
//! with Arabic month names the way the customer-facing apps do.

use chrono::{DateTime, Datelike, Timelike, Utc};

const MONTHS: [&str; 12] = [
    "يناير",
    "فبراير",
    "مارس",
    "أبريل",
    "مايو",
    "يونيو",
    "يوليو",
    "أغسطس",
    "سبتمبر",
    "أكتوبر",
    "نوفمبر",
    "ديسمبر",
];

const ONES: [&str; 10] = [
    "صفر",
    "واحد",
    "اثنان",
    "ثلاثة",
    "أربعة",
    "خمسة",
    "ستة",
    "سبعة",
    "ثمانية",
    "تسعة",
];

const TENS: [&str; 10] = [
    "",
    "عشرة",
    "عشرون",
    "ثلاثون",
    "أربعون",
    "خمسون",
    "ستون",
    "سبعون",
    "ثمانون",
    "تسعون",
];

const HUNDREDS: [&str; 10] = [
    "",
    "مائة",
    "مائتان",
    "ثلاثمائة",
    "أربعمائة",
    "خمسمائة",
    "ستمائة",
    "سبعمائة",
    "ثمانمائة",
    "تسعمائة",
];

/// Fixed two-decimal amount followed by the currency label.
pub fn format_money(value: f64, currency_label: &str) -> String {
    format!("{:.2} {}", value, currency_label)
}

/// Day-month-year with the month spelled out, e.g. `29 أغسطس 2026`.
pub fn format_date(at: DateTime<Utc>) -> String {
    let month = MONTHS[(at.month0() as usize).min(MONTHS.len() - 1)];
    format!("{} {} {}", at.day(), month, at.year())
}

/// 12-hour clock with Arabic day-period markers, e.g. `3:45 م`.
pub fn format_time(at: DateTime<Utc>) -> String {
    let (pm, hour) = at.hour12();
    let marker = if pm { "م" } else { "ص" };
    format!("{}:{:02} {}", hour, at.minute(), marker)
}

/// Spell out a whole number in Arabic. Supports everything below a billion;
/// the single caller falls back to digits above that.
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    let millions = n / 1_000_000;
    let thousands = (n % 1_000_000) / 1_000;
    let rest = n % 1_000;

    if millions > 0 {
        parts.push(group_with_unit(millions, "مليون", "مليونان", "ملايين"));
    }
    if thousands > 0 {
        parts.push(group_with_unit(thousands, "ألف", "ألفان", "آلاف"));
    }
    if rest > 0 {
        parts.push(words_below_thousand(rest));
    }

    parts.join(" و")
}

/// A monetary amount in words: integer part spelled out, cents appended as a
/// fraction when present. Amounts of a billion or more render as digits.
pub fn amount_in_words(value: f64, currency_words: &str) -> String {
    let negative = value < 0.0;
    let abs = value.abs();
    let whole = abs.trunc() as u64;
    let cents = ((abs.fract() * 100.0).round() as u64) % 100;

    let mut out = if whole >= 1_000_000_000 {
        format!("{} {}", whole, currency_words)
    } else {
        format!("{} {}", number_to_words(whole), currency_words)
    };

    if cents > 0 {
        out.push_str(&format!(" و{}/100", cents));
    }
    if negative {
        out = format!("سالب {}", out);
    }
    out
}

fn words_below_thousand(n: u64) -> String {
    debug_assert!(n < 1_000);
    let hundreds = (n / 100) as usize;
    let below = n % 100;

    let mut parts: Vec<String> = Vec::new();
    if hundreds > 0 {
        parts.push(HUNDREDS[hundreds].to_string());
    }
    if below > 0 || parts.is_empty() {
        parts.push(words_below_hundred(below));
    }
    parts.join(" و")
}

fn words_below_hundred(n: u64) -> String {
    debug_assert!(n < 100);
    match n {
        0..=9 => ONES[n as usize].to_string(),
        10 => TENS[1].to_string(),
        11 => "أحد عشر".to_string(),
        12 => "اثنا عشر".to_string(),
        13..=19 => format!("{} عشر", ONES[(n - 10) as usize]),
        _ => {
            let tens = (n / 10) as usize;
            let ones = n % 10;
            if ones == 0 {
                TENS[tens].to_string()
            } else {
                format!("{} و{}", ONES[ones as usize], TENS[tens])
            }
        }
    }
}

fn group_with_unit(count: u64, singular: &str, dual: &str, plural: &str) -> String {
    match count {
        1 => singular.to_string(),
        2 => dual.to_string(),
        3..=10 => format!("{} {}", number_to_words(count), plural),
        _ => format!("{} {}", number_to_words(count), singular),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn money_renders_two_decimals_with_label() {
        assert_eq!(format_money(20.0, "₪"), "20.00 ₪");
        assert_eq!(format_money(7.5, "₪"), "7.50 ₪");
        assert_eq!(format_money(-50.0, "₪"), "-50.00 ₪");
    }

    #[test]
    fn date_uses_arabic_month_names() {
        let at = Utc.with_ymd_and_hms(2026, 8, 29, 15, 45, 0).unwrap();
        assert_eq!(format_date(at), "29 أغسطس 2026");
        assert_eq!(format_time(at), "3:45 م");
    }

    #[test]
    fn morning_times_use_the_am_marker() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 9, 5, 0).unwrap();
        assert_eq!(format_time(at), "9:05 ص");
    }

    #[test]
    fn small_numbers_spell_out() {
        assert_eq!(number_to_words(0), "صفر");
        assert_eq!(number_to_words(7), "سبعة");
        assert_eq!(number_to_words(11), "أحد عشر");
        assert_eq!(number_to_words(25), "خمسة وعشرون");
        assert_eq!(number_to_words(100), "مائة");
        assert_eq!(number_to_words(125), "مائة وخمسة وعشرون");
    }

    #[test]
    fn thousands_pick_the_right_unit_form() {
        assert_eq!(number_to_words(1_000), "ألف");
        assert_eq!(number_to_words(2_000), "ألفان");
        assert_eq!(number_to_words(3_000), "ثلاثة آلاف");
        assert_eq!(number_to_words(11_000), "أحد عشر ألف");
        assert_eq!(number_to_words(1_250), "ألف ومائتان وخمسون");
    }

    #[test]
    fn amounts_append_cents_as_a_fraction() {
        assert_eq!(amount_in_words(20.0, "شيقل"), "عشرون شيقل");
        assert_eq!(amount_in_words(20.5, "شيقل"), "عشرون شيقل و50/100");
        assert_eq!(amount_in_words(-50.0, "شيقل"), "سالب خمسون شيقل");
    }
}
