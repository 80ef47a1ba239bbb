//! Core types for the conversion pipeline.

use std::path::PathBuf;

use serde_json::Value;

use crate::error::ConvertError;

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// OpenAPI version family, detected from the document's declared version.
///
/// Determines where type definitions live (`definitions` vs
/// `components.schemas`) and how local references are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecVersion {
    /// Swagger 2.x: definitions under `#/definitions`.
    V2,
    /// OpenAPI 3.0 and later: definitions under `#/components/schemas`.
    V3,
}

impl SpecVersion {
    /// Detect the version family from a parsed document.
    ///
    /// Reads the `swagger` (2.x) or `openapi` (3.x) key. YAML parsers may
    /// surface an unquoted version as a number, so both string and number
    /// values are accepted. Classification compares the parsed major
    /// component as an integer, so a hypothetical "10.0" counts as 3.0+.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` when neither key is present or the
    /// declared value has no parseable major component.
    pub fn detect(document: &Value) -> Result<Self, ConvertError> {
        let declared = document
            .get("swagger")
            .or_else(|| document.get("openapi"))
            .ok_or_else(|| ConvertError::MalformedDocument {
                reason: "missing swagger/openapi version key".into(),
            })?;

        let text = match declared {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => {
                return Err(ConvertError::MalformedDocument {
                    reason: format!("version key is {}, expected string", json_type_name(other)),
                })
            }
        };

        let major: u64 = text
            .split('.')
            .next()
            .unwrap_or_default()
            .trim()
            .parse()
            .map_err(|_| ConvertError::MalformedDocument {
                reason: format!("unparseable version {:?}", text),
            })?;

        Ok(if major < 3 {
            SpecVersion::V2
        } else {
            SpecVersion::V3
        })
    }

    /// The local anchor prefix referencing a named type in this version.
    pub fn ref_anchor(&self) -> &'static str {
        match self {
            SpecVersion::V2 => "#/definitions/",
            SpecVersion::V3 => "#/components/schemas/",
        }
    }
}

/// Options for a conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Convert only this type instead of the whole document.
    pub name: Option<String>,
    /// Prefix prepended to rewritten local references (pre-3.0 only).
    pub prefix: String,
    /// Fully inline all references instead of leaving JSON pointers.
    pub stand_alone: bool,
    /// In single-named mode, embed every type the named type references.
    pub include_references: bool,
    /// Namespace output file names by API group/version (Kubernetes).
    pub expanded: bool,
    /// Enable Kubernetes-specific rules.
    pub kubernetes: bool,
    /// Set `additionalProperties: false` wherever `properties` exists.
    pub strict: bool,
    /// Directory receiving the generated schema files.
    pub output_dir: PathBuf,
}

impl ConvertOptions {
    /// Create options for a batch conversion into `output_dir`, with every
    /// flag off. Flags are enabled through the builder methods.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: None,
            prefix: String::new(),
            stand_alone: false,
            include_references: false,
            expanded: false,
            kubernetes: false,
            strict: false,
            output_dir: output_dir.into(),
        }
    }

    /// Convert only the named type (single-named mode).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the reference prefix (pre-3.0 only).
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set stand-alone mode (dereference all pointers).
    pub fn stand_alone(mut self, stand_alone: bool) -> Self {
        self.stand_alone = stand_alone;
        self
    }

    /// Set whether referenced types are embedded in single-named mode.
    pub fn include_references(mut self, include_references: bool) -> Self {
        self.include_references = include_references;
        self
    }

    /// Set expanded (group/version-namespaced) output naming.
    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// Enable Kubernetes-specific rules.
    pub fn kubernetes(mut self, kubernetes: bool) -> Self {
        self.kubernetes = kubernetes;
        self
    }

    /// Set strict mode.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Context carried through every rewrite-rule invocation.
#[derive(Debug, Clone, Copy)]
pub struct RewriteContext<'a> {
    /// Prefix prepended to rewritten references (pre-3.0 only).
    pub prefix: &'a str,
    /// Version family governing reference syntax.
    pub version: SpecVersion,
    /// Whether the output is a single combined document (references stay
    /// local anchors) or one file per type (references become file names).
    pub single_file: bool,
}
