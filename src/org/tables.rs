//! Rule tables for the organization-name renderer
//!
//! Two immutable maps keyed by fully normalized Arabic tokens:
//! - the lexical table of curated English renderings (article not pre-stripped)
//! - the business table of legal-form words and activity descriptors
//!
//! The built-in tables are created once on first use and shared read-only.
//! An external UTF-8 JSON resource can replace them at startup.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::text::normalize;
use crate::TARGET_RENDER;

/// Legal-form suffix of a rendered name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrgType {
    Bank,
    Office,
    Group,
    Holding,
    Company,
}

impl OrgType {
    /// Suffix priority, highest first
    pub const PRIORITY: [OrgType; 5] = [
        OrgType::Bank,
        OrgType::Office,
        OrgType::Group,
        OrgType::Holding,
        OrgType::Company,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OrgType::Bank => "Bank",
            OrgType::Office => "Office",
            OrgType::Group => "Group",
            OrgType::Holding => "Holding",
            OrgType::Company => "Company",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|org_type| org_type.label() == label)
    }
}

impl fmt::Display for OrgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Legal-form word (Company, Bank, Group, Holding, Office)
    OrgType,
    /// Business-activity word (Trading, Services, ...)
    Descriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessEntry {
    pub label: String,
    pub role: Role,
}

impl BusinessEntry {
    pub fn descriptor(label: &str) -> Self {
        Self {
            label: label.to_string(),
            role: Role::Descriptor,
        }
    }

    pub fn org_type(org_type: OrgType) -> Self {
        Self {
            label: org_type.label().to_string(),
            role: Role::OrgType,
        }
    }

    pub fn is_descriptor(&self) -> bool {
        self.role == Role::Descriptor
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Failed to read rule tables from {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid rule tables JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Table key '{key}' is not normalized (expected '{normalized}')")]
    UnnormalizedKey { key: String, normalized: String },

    #[error("Org-type entry '{key}' has unknown label '{label}'")]
    UnknownOrgType { key: String, label: String },
}

/// On-disk shape of the rule tables resource
#[derive(Debug, Default, Deserialize, Serialize)]
struct TablesFile {
    #[serde(default)]
    lexical: HashMap<String, String>,
    #[serde(default)]
    business: HashMap<String, BusinessEntry>,
}

/// Immutable lexical and business tables
#[derive(Debug, Clone, Default)]
pub struct RuleTables {
    lexical: HashMap<String, String>,
    business: HashMap<String, BusinessEntry>,
}

lazy_static! {
    static ref BUILTIN: RuleTables = RuleTables::builtin_tables();
}

// Curated renderings for tokens whose phonetic output reads poorly
const LEXICAL: &[(&str, &str)] = &[
    ("القصر", "Qasr"),
    ("القصواء", "Qaswa"),
    ("الملك", "Al-Malik"),
    ("الخليج", "Al-Khalij"),
    ("النيل", "Al-Nil"),
    ("الشاطئ", "Al-Shati'"),
    ("البعيد", "Al-Ba'eed"),
    ("الشبكات", "Al-Shabakat"),
    ("الذكية", "Al-Dhakiyya"),
    ("الذهبي", "Al-Dhahabi"),
    ("زهرة", "Zahrat"),
    ("جوهرة", "Jawharat"),
    ("عهد", "Ahd"),
    ("اليقين", "Al-Yaqin"),
    ("فيض", "Fayd"),
    ("السعودية", "Al-Saudiya"),
    ("ارض", "Ard"),
    ("البروج", "Al-Barouj"),
    ("القاهرة", "Qahira"),
];

const ORG_TYPES: &[(&str, OrgType)] = &[
    ("شركة", OrgType::Company),
    ("شركه", OrgType::Company),
    ("مجموعة", OrgType::Group),
    ("مكتب", OrgType::Office),
    ("بنك", OrgType::Bank),
    ("مصرف", OrgType::Bank),
    ("قابضة", OrgType::Holding),
    ("القابضة", OrgType::Holding),
    ("قابضه", OrgType::Holding),
    // Legal-form abbreviations are absorbed without a suffix of their own
    ("ش.م.ع", OrgType::Company),
    ("ش.ذ.م.م", OrgType::Company),
];

const DESCRIPTORS: &[(&str, &str)] = &[
    ("تجارة", "Trading"),
    ("التجارة", "Trading"),
    ("للتجارة", "Trading"),
    ("لتجارة", "Trading"),
    ("لتجاره", "Trading"),
    ("للتجاره", "Trading"),
    ("تجاره", "Trading"),
    ("العامة", "Public"),
    ("العامه", "Public"),
    ("المقاولات", "Contracting"),
    ("للمقاولات", "Contracting"),
    ("مقاولات", "Contracting"),
    ("الاتصالات", "Telecommunications"),
    ("للاتصالات", "Telecommunications"),
    ("اتصالات", "Telecommunications"),
    ("الخدمات", "Services"),
    ("لخدمات", "Services"),
    ("خدمات", "Services"),
    ("الدفع", "Payment"),
    ("البناء", "Construction"),
    ("بناء", "Construction"),
];

impl RuleTables {
    /// Shared built-in tables, created once per process
    pub fn builtin() -> &'static RuleTables {
        &BUILTIN
    }

    fn builtin_tables() -> RuleTables {
        let lexical = LEXICAL
            .iter()
            .map(|(ar, en)| (ar.to_string(), en.to_string()))
            .collect();

        let business = ORG_TYPES
            .iter()
            .map(|(ar, org_type)| (ar.to_string(), BusinessEntry::org_type(*org_type)))
            .chain(
                DESCRIPTORS
                    .iter()
                    .map(|(ar, label)| (ar.to_string(), BusinessEntry::descriptor(label))),
            )
            .collect();

        RuleTables { lexical, business }
    }

    /// Build tables from explicit maps, rejecting keys that are not normalized.
    pub fn new(
        lexical: HashMap<String, String>,
        business: HashMap<String, BusinessEntry>,
    ) -> Result<Self, TableError> {
        for key in lexical.keys().chain(business.keys()) {
            let normalized = normalize(key);
            if &normalized != key {
                return Err(TableError::UnnormalizedKey {
                    key: key.clone(),
                    normalized,
                });
            }
        }

        for (key, entry) in &business {
            if entry.role == Role::OrgType && OrgType::from_label(&entry.label).is_none() {
                return Err(TableError::UnknownOrgType {
                    key: key.clone(),
                    label: entry.label.clone(),
                });
            }
        }

        Ok(RuleTables { lexical, business })
    }

    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        let file: TablesFile = serde_json::from_str(json)?;
        Self::new(file.lexical, file.business)
    }

    /// Load a UTF-8 JSON rule tables resource.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tables = Self::from_json_str(&json)?;
        info!(
            target: TARGET_RENDER,
            "Loaded {} lexical and {} business entries from {}",
            tables.lexical.len(),
            tables.business.len(),
            path.display()
        );
        Ok(tables)
    }

    pub fn lexical(&self, token: &str) -> Option<&str> {
        self.lexical.get(token).map(String::as_str)
    }

    pub fn business(&self, token: &str) -> Option<&BusinessEntry> {
        self.business.get(token)
    }

    pub fn lexical_len(&self) -> usize {
        self.lexical.len()
    }

    pub fn business_len(&self) -> usize {
        self.business.len()
    }
}
