//! Error taxonomy: code and message-template tables
//!
//! Both tables ship inside the binary. They are validated against
//! [`ErrorKind::ALL`] once at startup; an inconsistent taxonomy aborts the
//! process instead of producing ambiguous exit codes.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use thiserror::Error;
use tracing::debug;

use crate::domain::ErrorKind;

const CODES_TOML: &str = include_str!("../../resources/error_codes.toml");
const MESSAGES_TOML: &str = include_str!("../../resources/error_messages.toml");

static TAXONOMY: OnceLock<Taxonomy> = OnceLock::new();

/// Defects found while loading the taxonomy tables.
#[derive(Error, Debug)]
pub enum TaxonomyError {
    #[error("cannot parse {table} table: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: toml::de::Error,
    },

    #[error("{kind} has no entry in the {table} table")]
    Missing { table: &'static str, kind: ErrorKind },

    #[error("{table} table contains unknown kind: {key}")]
    UnknownKey { table: &'static str, key: String },

    #[error("code {code} is shared by {first} and {second}")]
    DuplicateCode {
        code: i32,
        first: ErrorKind,
        second: ErrorKind,
    },

    #[error("code {code} of {kind} is not a valid exit code (1..=255)")]
    CodeOutOfRange { code: i32, kind: ErrorKind },
}

/// Lookup tables for every [`ErrorKind`].
#[derive(Debug, Clone)]
pub struct Taxonomy {
    codes: HashMap<ErrorKind, i32>,
    templates: HashMap<ErrorKind, String>,
}

impl Taxonomy {
    /// Parse and validate a code table and a template table.
    pub fn load(codes_src: &str, templates_src: &str) -> Result<Self, TaxonomyError> {
        let raw_codes: BTreeMap<String, i32> =
            toml::from_str(codes_src).map_err(|source| TaxonomyError::Parse {
                table: "code",
                source,
            })?;
        let raw_templates: BTreeMap<String, String> =
            toml::from_str(templates_src).map_err(|source| TaxonomyError::Parse {
                table: "message",
                source,
            })?;

        let codes = index_by_kind("code", raw_codes)?;
        let templates = index_by_kind("message", raw_templates)?;

        let mut owners: HashMap<i32, ErrorKind> = HashMap::new();
        for kind in ErrorKind::ALL {
            let code = codes[kind];
            if !(1..=255).contains(&code) {
                return Err(TaxonomyError::CodeOutOfRange { code, kind: *kind });
            }
            if let Some(first) = owners.insert(code, *kind) {
                return Err(TaxonomyError::DuplicateCode {
                    code,
                    first,
                    second: *kind,
                });
            }
        }

        debug!("loaded error taxonomy with {} kinds", codes.len());
        Ok(Self { codes, templates })
    }

    /// The tables compiled into this binary.
    pub fn builtin() -> Result<Self, TaxonomyError> {
        Self::load(CODES_TOML, MESSAGES_TOML)
    }

    /// Load the built-in tables into the process-wide slot.
    ///
    /// Called first thing in `main`; later calls return the loaded taxonomy.
    pub fn init() -> Result<&'static Taxonomy, TaxonomyError> {
        if let Some(taxonomy) = TAXONOMY.get() {
            return Ok(taxonomy);
        }
        let taxonomy = Self::builtin()?;
        Ok(TAXONOMY.get_or_init(|| taxonomy))
    }

    /// The process-wide taxonomy.
    ///
    /// # Panics
    /// If the built-in tables are inconsistent and [`Taxonomy::init`] was
    /// not called first.
    pub fn global() -> &'static Taxonomy {
        TAXONOMY.get_or_init(|| {
            Self::builtin().unwrap_or_else(|e| panic!("error taxonomy is inconsistent: {e}"))
        })
    }

    pub fn code_of(&self, kind: ErrorKind) -> Option<i32> {
        self.codes.get(&kind).copied()
    }

    pub fn template_of(&self, kind: ErrorKind) -> Option<&str> {
        self.templates.get(&kind).map(String::as_str)
    }
}

/// Key a raw table by kind, rejecting unknown keys and missing kinds.
fn index_by_kind<V>(
    table: &'static str,
    raw: BTreeMap<String, V>,
) -> Result<HashMap<ErrorKind, V>, TaxonomyError> {
    let mut indexed = HashMap::with_capacity(raw.len());
    for (key, value) in raw {
        let kind = key
            .parse::<ErrorKind>()
            .map_err(|_| TaxonomyError::UnknownKey { table, key })?;
        indexed.insert(kind, value);
    }
    if let Some(kind) = ErrorKind::ALL.iter().find(|k| !indexed.contains_key(k)) {
        return Err(TaxonomyError::Missing { table, kind: *kind });
    }
    Ok(indexed)
}
