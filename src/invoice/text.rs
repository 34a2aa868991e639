//! Right-to-left text pipeline.
//!
//! The PDF backend draws glyph runs exactly as given; it performs neither
//! Arabic contextual joining nor bidi reordering. Every Text instruction's
//! content therefore passes through `shape` before emission: reshape Arabic
//! letters into their joined presentation forms, then reorder the line into
//! visual order. Strings without RTL characters pass through untouched.

use ar_reshaper::ArabicReshaper;
use once_cell::sync::Lazy;
use unicode_bidi::BidiInfo;

static RESHAPER: Lazy<ArabicReshaper> = Lazy::new(ArabicReshaper::default);

/// True when the string contains characters from an RTL script.
pub fn has_rtl(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{0590}'..='\u{08FF}'          // Hebrew, Arabic, Syriac, extensions
            | '\u{FB50}'..='\u{FDFF}'        // Arabic presentation forms A
            | '\u{FE70}'..='\u{FEFF}'        // Arabic presentation forms B
        )
    })
}

/// Prepare a logical-order string for a backend without bidi support.
pub fn shape(text: &str) -> String {
    if !has_rtl(text) {
        return text.to_string();
    }

    let reshaped = RESHAPER.reshape(text);
    let bidi = BidiInfo::new(&reshaped, None);
    let mut out = String::with_capacity(reshaped.len());
    for paragraph in &bidi.paragraphs {
        out.push_str(&bidi.reorder_line(paragraph, paragraph.range.clone()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_text_passes_through_unchanged() {
        assert_eq!(shape("invoice #42"), "invoice #42");
        assert_eq!(shape("20.00 EUR"), "20.00 EUR");
    }

    #[test]
    fn arabic_text_is_detected() {
        assert!(has_rtl("فاتورة"));
        assert!(!has_rtl("invoice"));
    }

    #[test]
    fn shaping_is_deterministic() {
        let input = "رقم الطلب: A1";
        assert_eq!(shape(input), shape(input));
    }

    #[test]
    fn shaped_arabic_uses_presentation_forms() {
        // After reshaping, isolated letters join; the output must differ from
        // the raw logical-order input and stay non-empty.
        let shaped = shape("ملاحظات");
        assert!(!shaped.is_empty());
        assert_ne!(shaped, "ملاحظات");
    }
}
