//! Connector specification types and secret-field classification.
//!
//! A specification carries the JSON Schema describing a connector's valid
//! configuration documents. Leaves annotated with `"wharf_secret": true` hold
//! credentials; the sub-annotation `"wharf_oauth": true` marks the subset of
//! those leaves that is populated from an OAuth consent flow.
//!
//! Classification is done once per specification version: [`SecretFields`]
//! walks the schema tree and produces the static set of secret field paths,
//! which every mask and reconcile call against that version then reuses.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema annotation marking a leaf as a secret.
pub const SECRET_ANNOTATION: &str = "wharf_secret";

/// Schema annotation marking a secret leaf as OAuth-sourced.
pub const OAUTH_ANNOTATION: &str = "wharf_oauth";

/// A versioned connector specification.
///
/// Immutable once published. Configuration records reference a specification
/// version; they never mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorSpecification {
    /// JSON Schema for valid configuration documents.
    pub connection_specification: Value,

    /// Documentation URL for the connector release.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,

    /// Declared version tag (e.g. an image tag).
    pub version_tag: String,
}

impl ConnectorSpecification {
    /// Create a specification from a connection schema and version tag.
    pub fn new(connection_specification: Value, version_tag: impl Into<String>) -> Self {
        Self {
            connection_specification,
            documentation_url: None,
            version_tag: version_tag.into(),
        }
    }

    /// Set the documentation URL.
    #[must_use]
    pub fn with_documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = Some(url.into());
        self
    }

    /// Classify the secret fields this specification declares.
    ///
    /// The result is intended to be computed once per resolved specification
    /// and reused across calls, not re-derived per document.
    #[must_use]
    pub fn secret_fields(&self) -> SecretFields {
        SecretFields::from_schema(&self.connection_specification)
    }
}

/// One step of a path from the document root to a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object property with the given key.
    Key(String),
    /// Any element of an array.
    AnyIndex,
}

/// A path from the document root to a field, with array positions wildcarded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The root path (no segments).
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend the path with an object key.
    #[must_use]
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.to_string()));
        Self { segments }
    }

    /// Extend the path into array elements.
    #[must_use]
    pub fn element(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::AnyIndex);
        Self { segments }
    }

    /// The segments of this path, root first.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "$");
        }
        let mut first = true;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => {
                    if !first {
                        write!(f, ".")?;
                    }
                    write!(f, "{key}")?;
                }
                PathSegment::AnyIndex => write!(f, "[]")?,
            }
            first = false;
        }
        Ok(())
    }
}

/// The static set of secret field paths a specification version declares.
///
/// Also records which object paths declare a closed property set, so strict
/// reconciliation can detect fields the schema cannot classify.
#[derive(Debug, Clone, Default)]
pub struct SecretFields {
    secret: Vec<FieldPath>,
    oauth: Vec<FieldPath>,
    declared: HashMap<FieldPath, HashSet<String>>,
    open: HashSet<FieldPath>,
}

impl SecretFields {
    /// Walk a connection schema and collect its secret field paths.
    #[must_use]
    pub fn from_schema(schema: &Value) -> Self {
        let mut fields = Self::default();
        fields.collect(schema, &FieldPath::root());
        fields
    }

    /// Paths of all secret-annotated leaves.
    #[must_use]
    pub fn secret_paths(&self) -> &[FieldPath] {
        &self.secret
    }

    /// Paths of the OAuth-sourced subset of secret leaves.
    #[must_use]
    pub fn oauth_paths(&self) -> &[FieldPath] {
        &self.oauth
    }

    /// Whether the specification declares any secrets at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.secret.is_empty()
    }

    /// Property keys the schema declares for the object at `path`, if the
    /// object has a closed property set. `None` means the schema places no
    /// constraint on keys at this path.
    #[must_use]
    pub fn declared_keys(&self, path: &FieldPath) -> Option<&HashSet<String>> {
        if self.open.contains(path) {
            return None;
        }
        self.declared.get(path)
    }

    fn collect(&mut self, schema: &Value, path: &FieldPath) {
        let Some(obj) = schema.as_object() else {
            return;
        };

        let is_secret = obj
            .get(SECRET_ANNOTATION)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let is_oauth = obj
            .get(OAUTH_ANNOTATION)
            .and_then(Value::as_bool)
            .unwrap_or(false);

        // An annotated node is a secret leaf; nothing below it is walked.
        // An OAuth annotation without the plain secret annotation still
        // counts as a secret, so the field can never slip through unmasked.
        if is_secret || is_oauth {
            if !self.secret.contains(path) {
                self.secret.push(path.clone());
            }
            if is_oauth && !self.oauth.contains(path) {
                self.oauth.push(path.clone());
            }
            return;
        }

        if let Some(properties) = obj.get("properties").and_then(Value::as_object) {
            let declared = self.declared.entry(path.clone()).or_default();
            for key in properties.keys() {
                declared.insert(key.clone());
            }
            // additionalProperties defaults to permissive in JSON Schema;
            // only an explicit `false` closes the property set.
            if obj.get("additionalProperties") != Some(&Value::Bool(false)) {
                self.open.insert(path.clone());
            }
            for (key, subschema) in properties {
                self.collect(subschema, &path.child(key));
            }
        } else if obj.get("type").and_then(Value::as_str) == Some("object") {
            self.open.insert(path.clone());
        }

        match obj.get("items") {
            Some(Value::Array(subschemas)) => {
                for subschema in subschemas {
                    self.collect(subschema, &path.element());
                }
            }
            Some(subschema) => self.collect(subschema, &path.element()),
            None => {}
        }

        for combinator in ["oneOf", "anyOf", "allOf"] {
            if let Some(branches) = obj.get(combinator).and_then(Value::as_array) {
                for branch in branches {
                    self.collect(branch, path);
                }
            }
        }
    }
}
