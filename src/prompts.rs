// prompts.rs

pub fn translation_prompt(arabic_text: &str) -> String {
    format!(
        "{} | Translate the Arabic text above into fluent English. Keep personal and place names
transliterated rather than translated, and keep numbers as they appear.

Reply with the English translation only. Do not quote the original, do not add notes, and do not
explain what you're doing.",
        arabic_text
    )
}
