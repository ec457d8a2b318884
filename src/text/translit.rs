//! Phonetic Arabic → Latin transliteration
//!
//! Works on a single token that may still carry diacritics, the definite
//! article and a final ta marbuta. Output is lowercase; callers capitalize.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

use super::normalizer::{self, is_diacritic, SHADDA, TATWEEL};

pub const DEFINITE_ARTICLE: &str = "ال";
pub const TA_MARBUTA: char = '\u{0629}';
const HA: char = '\u{0647}';

/// The fourteen sun letters that assimilate the lam of the definite article
pub const SUN_LETTERS: &[char] = &[
    'ت', 'ث', 'د', 'ذ', 'ر', 'ز', 'س', 'ش', 'ص', 'ض', 'ط', 'ظ', 'ل', 'ن',
];

/// Letters that can carry a shadda and be doubled
const GEMINABLE: &str = "ءاأإآبتثجحخدذرزسشصضطظعغفقكلمنهوىي";

lazy_static! {
    /// Base letter table: the 29 letters plus hamza forms
    static ref BASE: HashMap<char, &'static str> = {
        let mut map = HashMap::new();
        map.insert('ا', "a");
        map.insert('ب', "b");
        map.insert('ت', "t");
        map.insert('ث', "th");
        map.insert('ج', "j");
        map.insert('ح', "h");
        map.insert('خ', "kh");
        map.insert('د', "d");
        map.insert('ذ', "dh");
        map.insert('ر', "r");
        map.insert('ز', "z");
        map.insert('س', "s");
        map.insert('ش', "sh");
        map.insert('ص', "s");
        map.insert('ض', "d");
        map.insert('ط', "t");
        map.insert('ظ', "z");
        map.insert('ع', "'");
        map.insert('غ', "gh");
        map.insert('ف', "f");
        map.insert('ق', "q");
        map.insert('ك', "k");
        map.insert('ل', "l");
        map.insert('م', "m");
        map.insert('ن', "n");
        map.insert('ه', "h");
        map.insert('و', "w");
        map.insert('ي', "y");
        map.insert('ة', "t");
        // Hamza forms
        map.insert('ء', "'");
        map.insert('ؤ', "'");
        map.insert('ئ', "'");
        // Alef-seated hamza reads as its alef
        map.insert('أ', "a");
        map.insert('إ', "a");
        map.insert('آ', "a");
        map.insert('ى', "y");
        map
    };

    static ref GLOTTAL_BEFORE_VOWEL: Regex = Regex::new(r"'([aeiou])").unwrap();
    static ref HYPHEN_RUNS: Regex = Regex::new(r"-+").unwrap();
}

/// Switches for the phonetic rules applied by [`transliterate_token`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslitOptions {
    /// Render `ال` before a sun letter as `a` + that consonant + `-`
    pub assimilate_article: bool,
    /// Render a final ta marbuta as "a"
    pub ta_marbuta_as_a: bool,
    /// Double a letter carrying a shadda
    pub double_for_gemination: bool,
}

impl Default for TranslitOptions {
    fn default() -> Self {
        Self {
            assimilate_article: true,
            ta_marbuta_as_a: true,
            double_for_gemination: true,
        }
    }
}

impl TranslitOptions {
    /// All rules off: plain letter mapping plus the literal "al-" prefix.
    pub fn literal() -> Self {
        Self {
            assimilate_article: false,
            ta_marbuta_as_a: false,
            double_for_gemination: false,
        }
    }
}

pub fn is_sun_letter(c: char) -> bool {
    SUN_LETTERS.contains(&c)
}

/// Map every character through the base table.
///
/// Unmapped characters pass through unchanged; leftover vocalization marks
/// and tatweel are dropped.
pub fn map_letters(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    for c in token.chars() {
        if is_diacritic(c) || c == TATWEEL {
            continue;
        }
        match BASE.get(&c) {
            Some(latin) => out.push_str(latin),
            None => out.push(c),
        }
    }
    out
}

/// Drop a glottal marker before a vowel, collapse hyphen runs and trim hyphens.
fn post_process(out: &str) -> String {
    let out = GLOTTAL_BEFORE_VOWEL.replace_all(out, "$1");
    let out = HYPHEN_RUNS.replace_all(&out, "-");
    out.trim_matches('-').to_string()
}

/// Base-table transliteration with no article, gemination or ta marbuta rules.
pub fn transliterate_base(token: &str) -> String {
    post_process(&map_letters(token))
}

fn double_geminated(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let mut out = String::with_capacity(token.len() * 2);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == SHADDA {
            i += 1;
            continue;
        }
        out.push(c);
        if chars.get(i + 1) == Some(&SHADDA) && GEMINABLE.contains(c) {
            out.push(c);
            i += 1;
        }
        i += 1;
    }
    out
}

/// Transliterate a single Arabic token.
///
/// ```
/// use tarjama::text::translit::{transliterate_token, TranslitOptions};
///
/// assert_eq!(transliterate_token("الشمس", TranslitOptions::default()), "as-shms");
/// assert_eq!(transliterate_token("القمر", TranslitOptions::default()), "al-qmr");
/// ```
pub fn transliterate_token(token: &str, options: TranslitOptions) -> String {
    if token.is_empty() {
        return String::new();
    }

    let mut token = if options.double_for_gemination && token.contains(SHADDA) {
        double_geminated(token)
    } else {
        token.to_string()
    };

    let mut ends_as_a = false;
    if options.ta_marbuta_as_a && token.ends_with(TA_MARBUTA) {
        token.pop();
        token.push(HA);
        ends_as_a = true;
    }

    let mut out = String::new();
    let mut rest = token.as_str();
    if let Some(after_article) = token.strip_prefix(DEFINITE_ARTICLE) {
        match after_article.chars().next() {
            Some(next) if options.assimilate_article && is_sun_letter(next) => {
                // The lam is absorbed by the following sun letter
                let consonant = map_letters(&next.to_string());
                out.push('a');
                if let Some(first) = consonant.chars().next() {
                    out.push(first);
                }
                out.push('-');
            }
            _ => out.push_str("al-"),
        }
        rest = after_article;
    }

    out.push_str(&map_letters(rest));

    if ends_as_a && (out.ends_with('h') || out.ends_with('t')) {
        out.pop();
        out.push('a');
    }

    post_process(&out)
}

/// Transliterate a whole phrase token by token, space-joined.
pub fn transliterate_name(text: &str) -> String {
    normalizer::normalize(text)
        .split_whitespace()
        .map(|token| transliterate_token(token, TranslitOptions::default()))
        .collect::<Vec<_>>()
        .join(" ")
}
