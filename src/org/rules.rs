//! Token classification rules
//!
//! Each token of a name is run through [`RULES`] in order and the first rule
//! that matches decides what the token contributes to the rendered name.
//! A rule may also rewrite the token for the rules after it, which is how the
//! attached possessive prefix (لل) is peeled off.

use tracing::trace;

use super::tables::{OrgType, RuleTables};
use crate::text::translit::{transliterate_base, DEFINITE_ARTICLE};
use crate::TARGET_RENDER;

/// Attached possessive prefix and its presentation-form spelling
const POSSESSIVE_PREFIXES: &[&str] = &["لل", "ل\u{FEDF}"];

/// Exact legal-form keywords that nominate a suffix
pub const ORG_TYPE_KEYWORDS: &[(&str, OrgType)] = &[
    ("شركة", OrgType::Company),
    ("شركه", OrgType::Company),
    ("مجموعة", OrgType::Group),
    ("مكتب", OrgType::Office),
    ("بنك", OrgType::Bank),
    ("مصرف", OrgType::Bank),
    ("قابضة", OrgType::Holding),
    ("القابضة", OrgType::Holding),
];

/// What a single token contributes to the rendered name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenClass {
    /// A word of the name body, in source order
    Body(String),
    /// An activity label placed before the suffix
    Descriptor(String),
    /// A legal-form suffix candidate
    OrgType(OrgType),
    /// Consumed without contributing anything
    Absorbed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Matched(TokenClass),
    /// Continue with the remaining rules on a rewritten token
    Rewrite(String),
    NoMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRule {
    PossessivePrefix,
    OrgTypeKeyword,
    BusinessTerm,
    LexicalOverride,
    DefiniteArticle,
    Fallback,
}

/// Rules in priority order, first match wins
pub const RULES: [TokenRule; 6] = [
    TokenRule::PossessivePrefix,
    TokenRule::OrgTypeKeyword,
    TokenRule::BusinessTerm,
    TokenRule::LexicalOverride,
    TokenRule::DefiniteArticle,
    TokenRule::Fallback,
];

pub fn has_article(token: &str) -> bool {
    token.starts_with(DEFINITE_ARTICLE)
}

fn strip_possessive(token: &str) -> Option<&str> {
    POSSESSIVE_PREFIXES
        .iter()
        .find_map(|prefix| token.strip_prefix(*prefix))
}

/// Upper-case the first character, leave the rest as is.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl TokenRule {
    pub fn apply(&self, token: &str, tables: &RuleTables) -> RuleOutcome {
        match self {
            TokenRule::PossessivePrefix => match strip_possessive(token) {
                Some(rest) => match tables.business(rest) {
                    Some(entry) if entry.is_descriptor() => {
                        RuleOutcome::Matched(TokenClass::Descriptor(entry.label.clone()))
                    }
                    _ => RuleOutcome::Rewrite(rest.to_string()),
                },
                None => RuleOutcome::NoMatch,
            },
            TokenRule::OrgTypeKeyword => ORG_TYPE_KEYWORDS
                .iter()
                .find(|(keyword, _)| *keyword == token)
                .map_or(RuleOutcome::NoMatch, |(_, org_type)| {
                    RuleOutcome::Matched(TokenClass::OrgType(*org_type))
                }),
            TokenRule::BusinessTerm => match tables.business(token) {
                Some(entry) if entry.is_descriptor() => {
                    RuleOutcome::Matched(TokenClass::Descriptor(entry.label.clone()))
                }
                // Org-type synonyms outside the keyword list add no second suffix
                Some(_) => RuleOutcome::Matched(TokenClass::Absorbed),
                None => RuleOutcome::NoMatch,
            },
            TokenRule::LexicalOverride => match tables.lexical(token) {
                Some(english) => {
                    let word = if has_article(token) && !english.to_lowercase().starts_with("al-")
                    {
                        format!("Al-{}", english)
                    } else {
                        english.to_string()
                    };
                    RuleOutcome::Matched(TokenClass::Body(word))
                }
                None => RuleOutcome::NoMatch,
            },
            TokenRule::DefiniteArticle => match token.strip_prefix(DEFINITE_ARTICLE) {
                // A bare article (آل, "family of") is joined to the next word at compose time
                Some("") => RuleOutcome::Matched(TokenClass::Body("Al".to_string())),
                Some(rest) => RuleOutcome::Matched(TokenClass::Body(format!(
                    "Al-{}",
                    capitalize(&transliterate_base(rest))
                ))),
                None => RuleOutcome::NoMatch,
            },
            TokenRule::Fallback => {
                RuleOutcome::Matched(TokenClass::Body(capitalize(&transliterate_base(token))))
            }
        }
    }
}

/// Classify one normalized token against the rule list.
///
/// [`TokenRule::Fallback`] closes the list and matches every token.
pub fn classify_token(token: &str, tables: &RuleTables) -> TokenClass {
    let mut working = token.to_string();
    for rule in RULES {
        match rule.apply(&working, tables) {
            RuleOutcome::Matched(class) => {
                trace!(target: TARGET_RENDER, "Token '{}' matched {:?}: {:?}", token, rule, class);
                return class;
            }
            RuleOutcome::Rewrite(rewritten) => working = rewritten,
            RuleOutcome::NoMatch => {}
        }
    }
    unreachable!("{:?} matches every token", TokenRule::Fallback)
}
