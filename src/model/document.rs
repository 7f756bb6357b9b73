//! Parsed DTDL model documents.

use serde_json::Value;

use super::ModelError;
use crate::dtmi::Dtmi;

/// A single DTDL model document.
///
/// The full JSON payload is kept verbatim; the identity and the direct
/// dependency references are extracted and validated once at parse time.
/// References come from two places: `schema` values of `Component`
/// entries under `contents`, and `extends` entries. String entries are
/// dependency edges; inline interface objects contribute their own
/// references but are not edges themselves.
#[derive(Debug, Clone)]
pub struct ModelDocument {
    id: Dtmi,
    dependencies: Vec<Dtmi>,
    json: Value,
}

impl ModelDocument {
    /// Parse a document from raw repository bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_json(value)
    }

    /// Build a document from an already-parsed JSON value.
    pub fn from_json(value: Value) -> Result<Self, ModelError> {
        if !value.is_object() {
            return Err(ModelError::Malformed(
                "expected a single model object".to_string(),
            ));
        }

        let id = value
            .get("@id")
            .and_then(|v| v.as_str())
            .ok_or(ModelError::MissingId)?;
        let id = Dtmi::parse(id)?;

        let mut references = Vec::new();
        collect_references(&value, &mut references);

        let mut dependencies: Vec<Dtmi> = Vec::with_capacity(references.len());
        for reference in references {
            let dtmi = Dtmi::parse(&reference)?;
            if !dependencies.contains(&dtmi) {
                dependencies.push(dtmi);
            }
        }

        Ok(Self {
            id,
            dependencies,
            json: value,
        })
    }

    /// The document's declared identity.
    pub fn id(&self) -> &Dtmi {
        &self.id
    }

    /// Direct dependency references, deduplicated.
    pub fn dependencies(&self) -> &[Dtmi] {
        &self.dependencies
    }

    /// The document payload.
    pub fn as_json(&self) -> &Value {
        &self.json
    }

    /// Consume the document, returning the payload.
    pub fn into_json(self) -> Value {
        self.json
    }
}

fn collect_references(value: &Value, references: &mut Vec<String>) {
    if let Some(contents) = value.get("contents").and_then(|v| v.as_array()) {
        for entry in contents {
            if entry.get("@type").and_then(|v| v.as_str()) != Some("Component") {
                continue;
            }
            if let Some(schema) = entry.get("schema").and_then(|v| v.as_str()) {
                references.push(schema.to_string());
            }
        }
    }

    match value.get("extends") {
        Some(Value::String(parent)) => references.push(parent.clone()),
        Some(Value::Array(parents)) => {
            for parent in parents {
                match parent {
                    Value::String(s) => references.push(s.clone()),
                    inline @ Value::Object(_) => collect_references(inline, references),
                    _ => {}
                }
            }
        }
        Some(inline @ Value::Object(_)) => collect_references(inline, references),
        _ => {}
    }
}
