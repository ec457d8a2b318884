pub mod normalizer;
pub mod translit;

pub use normalizer::{normalize, strip_diacritics};
pub use translit::{transliterate_name, transliterate_token, TranslitOptions};
