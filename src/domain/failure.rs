//! Classified failures: a taxonomy kind plus cause and named arguments

use std::error::Error as StdError;
use std::fmt;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

use crate::domain::response::{RpcError, RpcErrorData};
use crate::domain::{ErrorKind, Taxonomy};

/// Code reported for a kind missing from the code table.
///
/// Unreachable once [`Taxonomy::init`] has validated the tables.
pub const DEFAULT_CODE: i32 = -1;

/// Boxed underlying error carried as a failure's cause.
pub type Cause = Box<dyn StdError + Send + Sync + 'static>;

/// A free-text message from a library that reports failures only as text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct OpaqueError(pub String);

/// Named template arguments, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments(Vec<(String, String)>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing an earlier binding in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl fmt::Display) {
        let name = name.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Arguments
where
    K: Into<String>,
    V: fmt::Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut arguments = Arguments::new();
        for (name, value) in iter {
            arguments.insert(name, value);
        }
        arguments
    }
}

impl Serialize for Arguments {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A failure bound to one [`ErrorKind`].
///
/// Created where the failure is recognized, consumed once by the driver.
#[derive(Debug)]
pub struct ClassifiedFailure {
    kind: ErrorKind,
    cause: Option<Cause>,
    arguments: Arguments,
}

impl ClassifiedFailure {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            cause: None,
            arguments: Arguments::new(),
        }
    }

    pub fn caused_by(kind: ErrorKind, cause: impl Into<Cause>) -> Self {
        Self {
            kind,
            cause: Some(cause.into()),
            arguments: Arguments::new(),
        }
    }

    pub fn with_arguments<I, K, V>(kind: ErrorKind, arguments: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: fmt::Display,
    {
        Self {
            kind,
            cause: None,
            arguments: arguments.into_iter().collect(),
        }
    }

    pub fn with_cause_and_arguments<I, K, V>(
        kind: ErrorKind,
        cause: impl Into<Cause>,
        arguments: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: fmt::Display,
    {
        Self {
            kind,
            cause: Some(cause.into()),
            arguments: arguments.into_iter().collect(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Exit code of this failure's kind.
    pub fn code(&self) -> i32 {
        Taxonomy::global()
            .code_of(self.kind)
            .unwrap_or(DEFAULT_CODE)
    }

    /// The kind's template with every bound `${name}` substituted.
    pub fn rendered_message(&self) -> String {
        self.render_with(Taxonomy::global())
    }

    fn render_with(&self, taxonomy: &Taxonomy) -> String {
        match taxonomy.template_of(self.kind) {
            Some(template) => substitute(template, &self.arguments),
            None => self.kind.name().to_string(),
        }
    }

    /// JSON-RPC error object; `data` only when there is something to carry.
    pub fn to_structured_error(&self) -> RpcError {
        let data = if self.cause.is_some() || !self.arguments.is_empty() {
            Some(RpcErrorData {
                cause_message: self.cause.as_ref().map(|c| c.to_string()),
                arguments: (!self.arguments.is_empty()).then(|| self.arguments.clone()),
            })
        } else {
            None
        };
        RpcError {
            code: self.code(),
            message: self.rendered_message(),
            data,
        }
    }
}

impl fmt::Display for ClassifiedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered_message())
    }
}

impl StdError for ClassifiedFailure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

impl From<ErrorKind> for ClassifiedFailure {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap_or_else(|e| panic!("{e}"))
    })
}

/// Replace `${name}` placeholders; unbound ones stay literal.
fn substitute(template: &str, arguments: &Arguments) -> String {
    placeholder()
        .replace_all(template, |caps: &Captures| {
            arguments
                .get(&caps[1])
                .map(str::to_string)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
