//! Schema-driven masking and reconciliation of secret configuration fields.
//!
//! The pipeline is a two-phase transform: secrets are masked on every outward
//! path and reconciled back in on the inward path. The placeholder is a
//! sentinel, never data — it is defined once here and recognized everywhere.

use serde_json::Value;
use tracing::warn;

use crate::error::{SecretsError, SecretsResult};
use crate::spec::{FieldPath, PathSegment, SecretFields};

/// Fixed placeholder substituted for every secret value on output.
pub const SECRET_PLACEHOLDER: &str = "**********";

/// Policy for fields present in a document but absent from the schema during
/// reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFieldPolicy {
    /// Unknown fields are treated as non-secret and pass through unchanged.
    #[default]
    PassThrough,
    /// Unknown fields fail reconciliation with
    /// [`SecretsError::SchemaMismatch`].
    Reject,
}

/// Stateless engine for masking and reconciling secret fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretsProcessor {
    policy: UnknownFieldPolicy,
}

impl SecretsProcessor {
    /// Create a processor with the default pass-through policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with an explicit unknown-field policy.
    #[must_use]
    pub fn with_policy(policy: UnknownFieldPolicy) -> Self {
        Self { policy }
    }

    /// Replace every secret leaf with the placeholder.
    ///
    /// All non-secret fields are returned structurally and value-identical to
    /// the input. Deterministic and idempotent: masking an already-masked
    /// document is a no-op. Fields the schema does not describe pass through
    /// unchanged.
    #[must_use]
    pub fn mask_for_output(&self, fields: &SecretFields, document: &Value) -> Value {
        mask_paths(document, fields.secret_paths())
    }

    /// Restore placeholder-valued secret leaves from `previous`.
    ///
    /// For every secret leaf: an incoming placeholder means "unchanged" and
    /// is replaced with the previously stored value; any other incoming value
    /// wins, including `null`, which is an explicit clear. Non-secret fields
    /// always take the incoming value. Array elements are paired by position
    /// only when previous and incoming lengths match; otherwise the incoming
    /// array stands wholesale.
    pub fn reconcile_secrets(
        &self,
        fields: &SecretFields,
        previous: &Value,
        incoming: &Value,
    ) -> SecretsResult<Value> {
        if self.policy == UnknownFieldPolicy::Reject {
            ensure_classifiable(fields, incoming, &FieldPath::root())?;
        }

        let mut reconciled = incoming.clone();
        for path in fields.secret_paths() {
            reconcile_path(&mut reconciled, previous, path, path.segments());
        }
        Ok(reconciled)
    }
}

/// Mask the given paths in a copy of `document`.
pub(crate) fn mask_paths(document: &Value, paths: &[FieldPath]) -> Value {
    let mut masked = document.clone();
    for path in paths {
        mask_path(&mut masked, path.segments());
    }
    masked
}

fn mask_path(node: &mut Value, segments: &[PathSegment]) {
    match segments.split_first() {
        None => {
            // A null secret stays null: there is no value to hide, and
            // substituting the placeholder would fabricate one.
            if node.is_null() || node.as_str() == Some(SECRET_PLACEHOLDER) {
                return;
            }
            *node = Value::String(SECRET_PLACEHOLDER.to_string());
        }
        Some((PathSegment::Key(key), rest)) => {
            if let Some(child) = node.get_mut(key) {
                mask_path(child, rest);
            }
        }
        Some((PathSegment::AnyIndex, rest)) => {
            if let Some(elements) = node.as_array_mut() {
                for element in elements {
                    mask_path(element, rest);
                }
            }
        }
    }
}

fn reconcile_path(incoming: &mut Value, previous: &Value, full: &FieldPath, segments: &[PathSegment]) {
    match segments.split_first() {
        None => {
            if incoming.as_str() == Some(SECRET_PLACEHOLDER) {
                if previous.is_null() {
                    // Nothing stored to restore; the placeholder is inert and
                    // schema validation downstream decides its fate.
                    warn!(path = %full, "placeholder received for a secret with no stored value");
                } else {
                    *incoming = previous.clone();
                }
            }
        }
        Some((PathSegment::Key(key), rest)) => {
            if let Some(child) = incoming.get_mut(key) {
                let previous_child = previous.get(key).unwrap_or(&Value::Null);
                reconcile_path(child, previous_child, full, rest);
            }
        }
        Some((PathSegment::AnyIndex, rest)) => {
            if let (Some(elements), Some(previous_elements)) =
                (incoming.as_array_mut(), previous.as_array())
            {
                // Positional identity only holds when the array shape is
                // unchanged; on a length change the incoming array stands.
                if elements.len() == previous_elements.len() {
                    for (element, previous_element) in
                        elements.iter_mut().zip(previous_elements)
                    {
                        reconcile_path(element, previous_element, full, rest);
                    }
                }
            }
        }
    }
}

fn ensure_classifiable(
    fields: &SecretFields,
    node: &Value,
    path: &FieldPath,
) -> SecretsResult<()> {
    match node {
        Value::Object(entries) => {
            let declared = fields.declared_keys(path);
            for (key, child) in entries {
                if let Some(declared) = declared {
                    if !declared.contains(key) {
                        return Err(SecretsError::SchemaMismatch {
                            path: path.child(key).to_string(),
                        });
                    }
                }
                ensure_classifiable(fields, child, &path.child(key))?;
            }
            Ok(())
        }
        Value::Array(elements) => {
            let element_path = path.element();
            for element in elements {
                ensure_classifiable(fields, element, &element_path)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SecretFields;
    use serde_json::json;

    fn schema() -> Value {
        json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "host": { "type": "string" },
                "api_key": { "type": "string", "wharf_secret": true },
                "tunnel": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {
                        "ssh_key": { "type": "string", "wharf_secret": true },
                        "port": { "type": "integer" }
                    }
                },
                "replicas": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "additionalProperties": false,
                        "properties": {
                            "region": { "type": "string" },
                            "password": { "type": "string", "wharf_secret": true }
                        }
                    }
                }
            }
        })
    }

    fn fields() -> SecretFields {
        SecretFields::from_schema(&schema())
    }

    fn document() -> Value {
        json!({
            "host": "warehouse.internal",
            "api_key": "123-abc",
            "tunnel": { "ssh_key": "-----BEGIN KEY-----", "port": 22 },
            "replicas": [
                { "region": "eu-west-1", "password": "p1" },
                { "region": "us-east-1", "password": "p2" }
            ]
        })
    }

    #[test]
    fn mask_replaces_every_secret_leaf() {
        let processor = SecretsProcessor::new();
        let masked = processor.mask_for_output(&fields(), &document());

        assert_eq!(masked["api_key"], SECRET_PLACEHOLDER);
        assert_eq!(masked["tunnel"]["ssh_key"], SECRET_PLACEHOLDER);
        assert_eq!(masked["replicas"][0]["password"], SECRET_PLACEHOLDER);
        assert_eq!(masked["replicas"][1]["password"], SECRET_PLACEHOLDER);

        // Non-secret fields are untouched.
        assert_eq!(masked["host"], "warehouse.internal");
        assert_eq!(masked["tunnel"]["port"], 22);
        assert_eq!(masked["replicas"][0]["region"], "eu-west-1");
    }

    #[test]
    fn mask_is_idempotent() {
        let processor = SecretsProcessor::new();
        let once = processor.mask_for_output(&fields(), &document());
        let twice = processor.mask_for_output(&fields(), &once);

        assert_eq!(once, twice);
    }

    #[test]
    fn mask_leaves_null_and_absent_secrets_alone() {
        let processor = SecretsProcessor::new();
        let doc = json!({ "host": "h", "api_key": null });
        let masked = processor.mask_for_output(&fields(), &doc);

        assert_eq!(masked["api_key"], Value::Null);
        assert!(masked.get("tunnel").is_none());
    }

    #[test]
    fn mask_passes_unknown_fields_through() {
        let processor = SecretsProcessor::new();
        let doc = json!({ "host": "h", "api_key": "k", "extra": "kept" });
        let masked = processor.mask_for_output(&fields(), &doc);

        assert_eq!(masked["extra"], "kept");
    }

    #[test]
    fn reconcile_restores_placeholder_values() {
        let processor = SecretsProcessor::new();
        let previous = document();
        let masked = processor.mask_for_output(&fields(), &previous);

        let reconciled = processor
            .reconcile_secrets(&fields(), &previous, &masked)
            .unwrap();

        assert_eq!(reconciled, previous);
    }

    #[test]
    fn reconcile_keeps_new_secret_values() {
        let processor = SecretsProcessor::new();
        let previous = document();
        let mut incoming = processor.mask_for_output(&fields(), &previous);
        incoming["api_key"] = json!("456-def");
        incoming["host"] = json!("warehouse-2.internal");

        let reconciled = processor
            .reconcile_secrets(&fields(), &previous, &incoming)
            .unwrap();

        assert_eq!(reconciled["api_key"], "456-def");
        assert_eq!(reconciled["host"], "warehouse-2.internal");
        assert_eq!(reconciled["tunnel"]["ssh_key"], "-----BEGIN KEY-----");
    }

    #[test]
    fn reconcile_null_always_wins() {
        let processor = SecretsProcessor::new();
        let previous = document();
        let mut incoming = processor.mask_for_output(&fields(), &previous);
        incoming["api_key"] = Value::Null;

        let reconciled = processor
            .reconcile_secrets(&fields(), &previous, &incoming)
            .unwrap();

        assert_eq!(reconciled["api_key"], Value::Null);
    }

    #[test]
    fn reconcile_pairs_array_elements_by_position() {
        let processor = SecretsProcessor::new();
        let previous = document();
        let mut incoming = processor.mask_for_output(&fields(), &previous);
        incoming["replicas"][1]["password"] = json!("p2-rotated");

        let reconciled = processor
            .reconcile_secrets(&fields(), &previous, &incoming)
            .unwrap();

        assert_eq!(reconciled["replicas"][0]["password"], "p1");
        assert_eq!(reconciled["replicas"][1]["password"], "p2-rotated");
    }

    #[test]
    fn reconcile_takes_resized_arrays_wholesale() {
        let processor = SecretsProcessor::new();
        let previous = document();
        let incoming = json!({
            "host": "warehouse.internal",
            "api_key": SECRET_PLACEHOLDER,
            "tunnel": { "ssh_key": SECRET_PLACEHOLDER, "port": 22 },
            "replicas": [
                { "region": "ap-south-1", "password": "fresh" }
            ]
        });

        let reconciled = processor
            .reconcile_secrets(&fields(), &previous, &incoming)
            .unwrap();

        // The shrunk array is not reconciled element-by-element.
        assert_eq!(reconciled["replicas"].as_array().unwrap().len(), 1);
        assert_eq!(reconciled["replicas"][0]["password"], "fresh");
        // Secrets outside the array still reconcile.
        assert_eq!(reconciled["api_key"], "123-abc");
    }

    #[test]
    fn reconcile_passes_unknown_fields_through_by_default() {
        let processor = SecretsProcessor::new();
        let previous = document();
        let mut incoming = processor.mask_for_output(&fields(), &previous);
        incoming["tunnel"]["extra"] = json!("kept");

        // tunnel is additionalProperties: false, but the default policy does
        // not reject; the field rides through as non-secret.
        let reconciled = processor
            .reconcile_secrets(&fields(), &previous, &incoming)
            .unwrap();

        assert_eq!(reconciled["tunnel"]["extra"], "kept");
    }

    #[test]
    fn reconcile_rejects_unknown_fields_under_strict_policy() {
        let processor = SecretsProcessor::with_policy(UnknownFieldPolicy::Reject);
        let previous = document();
        let mut incoming = processor.mask_for_output(&fields(), &previous);
        incoming["tunnel"]["extra"] = json!("boom");

        let err = processor
            .reconcile_secrets(&fields(), &previous, &incoming)
            .unwrap_err();

        match err {
            SecretsError::SchemaMismatch { path } => assert_eq!(path, "tunnel.extra"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn strict_policy_accepts_conforming_documents() {
        let processor = SecretsProcessor::with_policy(UnknownFieldPolicy::Reject);
        let previous = document();
        let masked = processor.mask_for_output(&fields(), &previous);

        let reconciled = processor
            .reconcile_secrets(&fields(), &previous, &masked)
            .unwrap();

        assert_eq!(reconciled, previous);
    }

    #[test]
    fn no_secret_leaf_survives_masking() {
        let processor = SecretsProcessor::new();
        let masked = processor.mask_for_output(&fields(), &document());

        for path in fields().secret_paths() {
            assert_leaf_masked(&masked, path.segments());
        }
    }

    fn assert_leaf_masked(node: &Value, segments: &[PathSegment]) {
        match segments.split_first() {
            None => assert_eq!(node.as_str(), Some(SECRET_PLACEHOLDER)),
            Some((PathSegment::Key(key), rest)) => {
                if let Some(child) = node.get(key) {
                    assert_leaf_masked(child, rest);
                }
            }
            Some((PathSegment::AnyIndex, rest)) => {
                for element in node.as_array().into_iter().flatten() {
                    assert_leaf_masked(element, rest);
                }
            }
        }
    }
}
