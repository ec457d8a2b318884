//! Name-versus-sentence routing
//!
//! Text is sent to the organization-name renderer only when it looks like a
//! name. Two independent checks decide that: the script gate (share of Arabic
//! characters) runs first, then the keyword override, then the length and
//! punctuation check.

use serde::Serialize;
use tracing::debug;

use crate::org::renderer::name_tokens;
use crate::org::OrgNameRenderer;
use crate::text::normalize;
use crate::text::normalizer::is_arabic_block;
use crate::translator::{StatisticalTranslator, TranslatorError};
use crate::TARGET_ROUTING;

/// Minimum share of Arabic characters for the renderer path
pub const MIN_ARABIC_RATIO: f64 = 0.6;

/// Maximum token count for keyword-less names
pub const MAX_NAME_TOKENS: usize = 8;

/// Keywords that mark text as an organization name
pub const ORG_KEYWORDS: &[&str] = &[
    "شركة",
    "شركه",
    "مجموعة",
    "بنك",
    "مصرف",
    "قابضة",
    "القابضة",
    "قابضه",
    "ش.م.ع",
    "ش م ع",
    "ش.ذ.م.م",
    "ش ذ م م",
];

/// Punctuation that marks a sentence rather than a name
pub const SENTENCE_PUNCTUATION: &[char] = &['؟', '?', '!', ';', ',', ':'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    OrgRenderer,
    Translator,
}

fn counts_as_arabic(c: char) -> bool {
    is_arabic_block(c) || c == ' ' || c == '.'
}

/// Share of characters that are Arabic-block letters, spaces or periods.
pub fn arabic_ratio(normalized: &str) -> f64 {
    let total = normalized.chars().count();
    if total == 0 {
        return 0.0;
    }
    let arabic = normalized.chars().filter(|c| counts_as_arabic(*c)).count();
    arabic as f64 / total as f64
}

/// Script gate: non-empty and at least [`MIN_ARABIC_RATIO`] Arabic.
pub fn passes_script_gate(normalized: &str) -> bool {
    !normalized.is_empty() && arabic_ratio(normalized) >= MIN_ARABIC_RATIO
}

/// Keyword override: any organization keyword as a substring.
pub fn contains_org_keyword(normalized: &str) -> bool {
    ORG_KEYWORDS.iter().any(|keyword| normalized.contains(keyword))
}

/// Short and free of sentence punctuation.
pub fn is_short_phrase(normalized: &str) -> bool {
    normalized.split_whitespace().count() <= MAX_NAME_TOKENS
        && !normalized.contains(SENTENCE_PUNCTUATION)
}

/// Decide whether text is likely an organization name.
pub fn is_likely_org_name(text: &str) -> bool {
    let normalized = normalize(text);
    passes_script_gate(&normalized)
        && (contains_org_keyword(&normalized) || is_short_phrase(&normalized))
}

pub fn route(text: &str) -> Route {
    let route = if is_likely_org_name(text) {
        Route::OrgRenderer
    } else {
        Route::Translator
    };
    debug!(target: TARGET_ROUTING, "Routed '{}' to {:?}", text, route);
    route
}

/// Breakdown of a routing decision for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingReport {
    pub input: String,
    pub normalized: String,
    pub tokens: Vec<String>,
    pub arabic_ratio: f64,
    pub script_gate: bool,
    pub keyword_hit: bool,
    pub short_phrase: bool,
    pub route: Route,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renderer_preview: Option<String>,
}

/// Explain how `text` would be routed, with a renderer preview when applicable.
pub fn explain(text: &str, renderer: &OrgNameRenderer<'_>) -> RoutingReport {
    let normalized = normalize(text);
    let script_gate = passes_script_gate(&normalized);
    let keyword_hit = contains_org_keyword(&normalized);
    let short_phrase = is_short_phrase(&normalized);
    let route = if script_gate && (keyword_hit || short_phrase) {
        Route::OrgRenderer
    } else {
        Route::Translator
    };

    RoutingReport {
        input: text.to_string(),
        arabic_ratio: arabic_ratio(&normalized),
        tokens: name_tokens(text),
        normalized,
        script_gate,
        keyword_hit,
        short_phrase,
        route,
        renderer_preview: (route == Route::OrgRenderer).then(|| renderer.render(text)),
    }
}

/// Render names, translate everything else.
///
/// Exactly one of the renderer or the translator runs. Translator errors are
/// returned as is.
pub async fn translate_smart<T>(
    text: &str,
    renderer: &OrgNameRenderer<'_>,
    translator: &T,
) -> Result<String, TranslatorError>
where
    T: StatisticalTranslator + ?Sized,
{
    match route(text) {
        Route::OrgRenderer => Ok(renderer.render(text)),
        Route::Translator => translator.translate(text).await,
    }
}
