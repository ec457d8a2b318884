use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use super::rules::{capitalize, classify_token, TokenClass};
use super::tables::{OrgType, RuleTables};
use crate::text::{normalize, strip_diacritics};
use crate::TARGET_RENDER;

lazy_static! {
    static ref SPACE_RUNS: Regex = Regex::new(r"\s+").unwrap();
    static ref ARTICLE_VARIANTS: Regex = Regex::new(r"(?i)\bal[- ]").unwrap();
}

/// A name split into its three ordered parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedName {
    /// Capitalized body words in source order
    pub body: Vec<String>,
    /// Activity labels, deduplicated, first occurrence order
    pub descriptors: Vec<String>,
    pub suffix: OrgType,
}

impl RenderedName {
    /// Join the parts and canonicalize spacing and the article rendering.
    ///
    /// Article cleanup only touches the body, so a trailing "Al" body word
    /// never fuses with the descriptors or the suffix.
    pub fn compose(&self) -> String {
        let body = self
            .body
            .iter()
            .map(String::as_str)
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let body = SPACE_RUNS.replace_all(body.trim(), " ");
        let body = ARTICLE_VARIANTS.replace_all(&body, "Al-");

        std::iter::once(body.as_ref())
            .chain(self.descriptors.iter().map(String::as_str))
            .chain(std::iter::once(self.suffix.label()))
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for RenderedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compose())
    }
}

/// Pick the single suffix; Company when no candidate was seen.
pub fn choose_suffix(candidates: &[OrgType]) -> OrgType {
    OrgType::PRIORITY
        .into_iter()
        .find(|org_type| candidates.contains(org_type))
        .unwrap_or(OrgType::Company)
}

/// Drop repeated labels, keeping the first occurrence of each.
pub fn dedup_labels(labels: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .into_iter()
        .filter(|label| seen.insert(label.clone()))
        .collect()
}

/// Normalized, diacritic-free tokens of a name
pub fn name_tokens(text: &str) -> Vec<String> {
    strip_diacritics(&normalize(text))
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Renders Arabic organization names as business-style English
#[derive(Debug, Clone, Copy)]
pub struct OrgNameRenderer<'a> {
    tables: &'a RuleTables,
}

impl Default for OrgNameRenderer<'static> {
    fn default() -> Self {
        Self::new(RuleTables::builtin())
    }
}

impl<'a> OrgNameRenderer<'a> {
    pub fn new(tables: &'a RuleTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'a RuleTables {
        self.tables
    }

    pub fn render_parts(&self, text: &str) -> RenderedName {
        let mut body = Vec::new();
        let mut descriptors = Vec::new();
        let mut candidates = Vec::new();

        for token in name_tokens(text) {
            match classify_token(&token, self.tables) {
                TokenClass::Body(word) => body.push(word),
                TokenClass::Descriptor(label) => descriptors.push(label),
                TokenClass::OrgType(org_type) => candidates.push(org_type),
                TokenClass::Absorbed => {}
            }
        }

        let body = body
            .iter()
            .map(|word| capitalize(word))
            .filter(|word| !word.eq_ignore_ascii_case("company"))
            .collect();

        RenderedName {
            body,
            descriptors: dedup_labels(descriptors),
            suffix: choose_suffix(&candidates),
        }
    }

    pub fn render(&self, text: &str) -> String {
        let parts = self.render_parts(text);
        let rendered = parts.compose();
        debug!(
            target: TARGET_RENDER,
            "Rendered '{}' as '{}' (suffix {}, {} descriptor(s))",
            text,
            rendered,
            parts.suffix,
            parts.descriptors.len()
        );
        rendered
    }
}

/// Render with the built-in rule tables.
pub fn render_org_name(text: &str) -> String {
    OrgNameRenderer::default().render(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holding_with_legal_abbreviation() {
        assert_eq!(
            render_org_name("شركة القاهرة القابضة ش.م.ع"),
            "Al-Qahira Holding"
        );
    }

    #[test]
    fn test_bank_with_article_body() {
        assert_eq!(
            render_org_name("مصرف الرافدين الإسلامي"),
            "Al-Rafdyn Al-Aslamy Bank"
        );
    }

    #[test]
    fn test_unknown_tokens_default_to_company() {
        assert_eq!(render_org_name("زبزب طرطر"), "Zbzb Trtr Company");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render_org_name(""), "Company");
        assert_eq!(render_org_name("   "), "Company");
    }

    #[test]
    fn test_bank_outranks_company() {
        assert_eq!(render_org_name("شركة بنك الخليج"), "Al-Khalij Bank");
        assert_eq!(render_org_name("بنك شركة الخليج"), "Al-Khalij Bank");
    }

    #[test]
    fn test_descriptors_are_deduplicated() {
        let parts = OrgNameRenderer::default()
            .render_parts("شركة الخليج للتجارة التجارة تجارة العامة للتجارة");
        assert_eq!(parts.descriptors, vec!["Trading", "Public"]);
        assert_eq!(parts.compose(), "Al-Khalij Trading Public Company");
    }

    #[test]
    fn test_descriptor_order_and_group() {
        assert_eq!(
            render_org_name("مجموعة النيل للمقاولات والبناء للاتصالات"),
            "Al-Nil Walbna' Contracting Telecommunications Group"
        );
    }

    #[test]
    fn test_diacritics_and_tatweel_ignored() {
        assert_eq!(
            render_org_name("شَرِكَةُ   الخَلِيـــج"),
            "Al-Khalij Company"
        );
    }

    #[test]
    fn test_office_suffix() {
        assert_eq!(render_org_name("مكتب الملك"), "Al-Malik Office");
    }

    #[test]
    fn test_output_ends_with_one_suffix() {
        let samples = [
            "",
            "زبزب",
            "شركة مجموعة مكتب بنك قابضة",
            "القابضة القابضة",
            "للتجارة",
            "مكتب عال",
            "بنك آل",
        ];
        let suffixes = ["Bank", "Office", "Group", "Holding", "Company"];
        for sample in samples {
            let rendered = render_org_name(sample);
            let last = rendered.split_whitespace().last().unwrap_or_default();
            assert!(suffixes.contains(&last), "{:?} -> {:?}", sample, rendered);
            let count = rendered
                .split_whitespace()
                .filter(|word| suffixes.contains(word))
                .count();
            assert_eq!(count, 1, "{:?} -> {:?}", sample, rendered);
        }
    }

    #[test]
    fn test_body_never_contains_company() {
        let mut lexical = std::collections::HashMap::new();
        lexical.insert("كومباني".to_string(), "Company".to_string());
        let tables = RuleTables::new(lexical, Default::default()).unwrap();
        let renderer = OrgNameRenderer::new(&tables);
        assert_eq!(renderer.render("كومباني زبزب"), "Zbzb Company");
    }

    #[test]
    fn test_custom_tables() {
        let json = r#"{ "lexical": { "الاسلامي": "Islamic" } }"#;
        let tables = RuleTables::from_json_str(json).unwrap();
        let renderer = OrgNameRenderer::new(&tables);
        // Without the built-in business table, مصرف is still a keyword
        assert_eq!(
            renderer.render("مصرف الرافدين الإسلامي"),
            "Al-Rafdyn Al-Islamic Bank"
        );
    }

    #[test]
    fn test_trailing_al_body_word_keeps_suffix() {
        assert_eq!(render_org_name("مكتب عال"), "Al Office");
        assert_eq!(render_org_name("عال للتجارة"), "Al Trading Company");
    }

    #[test]
    fn test_bare_article_joins_next_word() {
        assert_eq!(render_org_name("شركة آل سعود"), "Al-S'wd Company");
        assert_eq!(render_org_name("مكتب آل"), "Al Office");
    }

    #[test]
    fn test_compose_canonicalizes_article() {
        let parts = RenderedName {
            body: vec!["al".to_string(), "Nour".to_string(), "AL-Huda".to_string()],
            descriptors: vec![],
            suffix: OrgType::Group,
        };
        assert_eq!(parts.compose(), "Al-Nour Al-Huda Group");
    }

    #[test]
    fn test_choose_suffix() {
        assert_eq!(choose_suffix(&[]), OrgType::Company);
        assert_eq!(
            choose_suffix(&[OrgType::Company, OrgType::Holding]),
            OrgType::Holding
        );
        assert_eq!(
            choose_suffix(&[OrgType::Group, OrgType::Office]),
            OrgType::Office
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let text = "شركة الاتصالات الذكية للخدمات";
        let first = render_org_name(text);
        for _ in 0..5 {
            assert_eq!(render_org_name(text), first);
        }
    }
}
