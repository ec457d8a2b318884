//! Arabic text normalization
//!
//! Canonicalizes raw Arabic input before any table lookup or routing:
//! - Unify alef-with-hamza variants (أ إ آ) to plain alef (ا)
//! - Replace alef maqsura (ى) with ya (ي)
//! - Remove tatweel (kashida)
//! - Remove Quranic annotation marks and the vocalization block
//! - Collapse whitespace and trim

pub const ALEF: char = '\u{0627}';
pub const YA: char = '\u{064A}';
pub const ALEF_MAQSURA: char = '\u{0649}';
pub const TATWEEL: char = '\u{0640}';
pub const SHADDA: char = '\u{0651}';

/// Alef variants folded into plain alef (ا)
const ALEF_VARIANTS: &[char] = &[
    '\u{0623}', // Alef with hamza above (أ)
    '\u{0625}', // Alef with hamza below (إ)
    '\u{0622}', // Alef with madda (آ)
];

/// Combining marks stripped during normalization.
///
/// Covers the Quranic annotation signs (U+0610..U+061A), the full
/// vocalization block including shadda (U+064B..U+065F) and the
/// superscript alef (U+0670).
#[inline]
pub fn is_diacritic(c: char) -> bool {
    matches!(c, '\u{0610}'..='\u{061A}' | '\u{064B}'..='\u{065F}' | '\u{0670}')
}

/// Characters of the basic Arabic block (U+0600..U+06FF).
#[inline]
pub fn is_arabic_block(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// Normalize Arabic text.
///
/// Total over any input: empty or non-Arabic strings come back with only
/// whitespace collapsed. Normalizing an already normalized string returns it
/// unchanged.
pub fn normalize(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            // Leading whitespace never sets the flag
            pending_space = !result.is_empty();
            continue;
        }

        let c = if ALEF_VARIANTS.contains(&c) {
            ALEF
        } else if c == ALEF_MAQSURA {
            YA
        } else {
            c
        };

        if c == TATWEEL || is_diacritic(c) {
            continue;
        }

        if pending_space {
            result.push(' ');
            pending_space = false;
        }
        result.push(c);
    }

    result
}

/// Remove combining diacritics only, leaving letters and spacing untouched.
pub fn strip_diacritics(text: &str) -> String {
    text.chars().filter(|c| !is_diacritic(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_removes_vocalization() {
        let input = "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ";
        assert_eq!(normalize(input), "بسم الله الرحمن الرحيم");
    }

    #[test]
    fn test_normalize_letter_variants() {
        assert_eq!(normalize("أحمد"), "احمد");
        assert_eq!(normalize("إسلام"), "اسلام");
        assert_eq!(normalize("آمال"), "امال");
        assert_eq!(normalize("مستشفى"), "مستشفي");
        // Ta marbuta is kept as is
        assert_eq!(normalize("شركة"), "شركة");
    }

    #[test]
    fn test_normalize_tatweel_and_spacing() {
        assert_eq!(normalize("  شـــركة \t\n  الخليج  "), "شركة الخليج");
        assert_eq!(normalize("\u{0610}"), "");
    }

    #[test]
    fn test_normalize_empty_and_latin() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("Hello   World"), "Hello World");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "  شَرِكَةُ   الإِتِّصَالَاتِ  ",
            "مصرف الرافدين الإسلامي",
            "XYZ123 ééé شركة",
            "ـــ \u{0670} ى أ",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_strip_diacritics_keeps_spacing() {
        assert_eq!(strip_diacritics("الشَّمْس  "), "الشمس  ");
    }
}
