//! Rule documents.
//!
//! A rule document describes a matcher over JSON values:
//!
//! ```json
//! {
//!   "schema": 1,
//!   "options": { "invokeCallableResult": true },
//!   "kinds": [{ "name": "divisibleBy", "method": "divisible_by" }],
//!   "cases": [
//!     { "kind": "is", "test": { "literal": 5 }, "result": "five" },
//!     { "kind": "divisibleBy", "test": { "literal": 2 }, "result": "even" },
//!     { "test": { "pattern": "^a" } }
//!   ],
//!   "default": "nope"
//! }
//! ```
//!
//! `kind` defaults to `is` and `result` defaults to `true`. A `null` or
//! missing `default` leaves the default unset.

use crate::catalog::MethodCatalog;
use crate::error::RulesError;
use caseline_kernel::{CaseRegistry, MatchOptions, Matcher, Outcome, TestSpec};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub const RULE_DOCUMENT_SCHEMA: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDocument {
    pub schema: u32,
    #[serde(default)]
    pub options: MatchOptions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<KindRow>,
    #[serde(default)]
    pub cases: Vec<CaseRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Binds a custom case-kind name to a catalog method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindRow {
    pub name: String,
    pub method: String,
    #[serde(default)]
    pub negate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRow {
    #[serde(default = "CaseRow::default_kind")]
    pub kind: String,
    pub test: TestRow,
    #[serde(default = "CaseRow::default_result")]
    pub result: Value,
}

impl CaseRow {
    fn default_kind() -> String {
        caseline_kernel::IS_KIND.to_string()
    }

    fn default_result() -> Value {
        Value::Bool(true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TestRow {
    Literal(Value),
    Pattern(String),
}

impl TestRow {
    fn to_spec(&self, index: usize) -> Result<TestSpec<Value>, RulesError> {
        match self {
            Self::Literal(value) => Ok(TestSpec::literal(value.clone())),
            Self::Pattern(source) => Regex::new(source)
                .map(TestSpec::pattern)
                .map_err(|source_err| RulesError::InvalidPattern {
                    index,
                    pattern: source.clone(),
                    source: source_err,
                }),
        }
    }
}

impl RuleDocument {
    pub fn from_json_str(text: &str) -> Result<Self, RulesError> {
        let document: Self = serde_json::from_str(text)?;
        document.validate()?;
        Ok(document)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, RulesError> {
        let document: Self = toml::from_str(text)?;
        document.validate()?;
        Ok(document)
    }

    /// Load a document, reading `.toml` files as TOML and anything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            _ => Self::from_json_str(&text),
        }
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.schema != RULE_DOCUMENT_SCHEMA {
            return Err(RulesError::UnsupportedSchema(self.schema));
        }
        Ok(())
    }

    /// Register the document's custom kinds, binding each to its catalog
    /// method. A kind whose method is missing from the catalog is rejected
    /// as an invalid argument.
    pub fn register_kinds(
        &self,
        registry: &CaseRegistry<Value>,
        catalog: &MethodCatalog,
    ) -> Result<(), RulesError> {
        for kind in &self.kinds {
            registry.register_method(&kind.name, catalog.get(&kind.method), kind.negate)?;
        }
        Ok(())
    }

    /// Build the matcher, resolving case kinds through `registry`.
    pub fn compile(
        &self,
        registry: &CaseRegistry<Value>,
    ) -> Result<Matcher<Value, Value>, RulesError> {
        self.validate()?;
        let mut cases = Vec::with_capacity(self.cases.len());
        for (index, row) in self.cases.iter().enumerate() {
            let factory = registry.resolve(&row.kind)?;
            let spec = row.test.to_spec(index)?;
            cases.push(Arc::new(factory.make(spec, row.result.clone())));
        }
        debug!(
            cases = cases.len(),
            kinds = self.kinds.len(),
            has_default = self.default.is_some(),
            "rule document compiled"
        );
        Ok(Matcher::from_parts(
            self.options.clone(),
            cases,
            self.default.clone().map(Outcome::Value),
        ))
    }

    /// Register the document's kinds into a fresh registry and compile.
    pub fn compile_with(
        &self,
        catalog: &MethodCatalog,
    ) -> Result<Matcher<Value, Value>, RulesError> {
        let registry = CaseRegistry::new();
        self.register_kinds(&registry, catalog)?;
        self.compile(&registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseline_kernel::CaselineError;
    use serde_json::json;

    fn divisible_by(spec: &TestSpec<Value>, subject: &Value) -> bool {
        match (spec.as_literal().and_then(Value::as_i64), subject.as_i64()) {
            (Some(divisor), Some(value)) if divisor != 0 => value % divisor == 0,
            _ => false,
        }
    }

    fn catalog() -> MethodCatalog {
        MethodCatalog::new().with_method("divisible_by", divisible_by)
    }

    #[test]
    fn json_document_compiles_in_order() {
        let document = RuleDocument::from_json_str(
            r#"{
                "schema": 1,
                "kinds": [{ "name": "divisibleBy", "method": "divisible_by" }],
                "cases": [
                    { "test": { "literal": 5 }, "result": "five" },
                    { "kind": "divisibleBy", "test": { "literal": 2 }, "result": "even" }
                ],
                "default": "nope"
            }"#,
        )
        .expect("parse");

        let matcher = document.compile_with(&catalog()).expect("compile");
        assert_eq!(matcher.len(), 2);
        assert_eq!(matcher.match_value(&json!(5)), Some(json!("five")));
        assert_eq!(matcher.match_value(&json!(4)), Some(json!("even")));
        assert_eq!(matcher.match_value(&json!(3)), Some(json!("nope")));
    }

    #[test]
    fn toml_document_matches_json_equivalent() {
        let document = RuleDocument::from_toml_str(
            r#"
            schema = 1
            default = "no"

            [options]
            invokeCallableResult = false
            team = "billing"

            [[cases]]
            test = { pattern = "^a" }
            result = "starts-with-a"

            [[cases]]
            kind = "not"
            test = { literal = "banana" }
            "#,
        )
        .expect("parse");

        assert!(!document.options.invoke_callable_result);
        assert_eq!(document.options.extra.get("team"), Some(&json!("billing")));
        assert_eq!(document.cases[1].result, json!(true));

        let matcher = document.compile(&CaseRegistry::new()).expect("compile");
        assert_eq!(matcher.match_value(&json!("apple")), Some(json!("starts-with-a")));
        assert_eq!(matcher.match_value(&json!("cherry")), Some(json!(true)));
        assert_eq!(matcher.match_value(&json!("banana")), Some(json!("no")));
    }

    #[test]
    fn serialized_document_omits_unset_parts() {
        let document = RuleDocument::from_json_str(
            r#"{ "schema": 1, "cases": [{ "test": { "literal": "x" } }] }"#,
        )
        .expect("parse");
        insta::assert_json_snapshot!(document, @r#"
        {
          "schema": 1,
          "options": {
            "invokeCallableResult": true
          },
          "cases": [
            {
              "kind": "is",
              "test": {
                "literal": "x"
              },
              "result": true
            }
          ]
        }
        "#);
    }

    #[test]
    fn unsupported_schema_is_rejected() {
        let err = RuleDocument::from_json_str(r#"{ "schema": 2 }"#)
            .err()
            .expect("schema");
        assert!(matches!(err, RulesError::UnsupportedSchema(2)));
    }

    #[test]
    fn invalid_pattern_reports_case_index() {
        let document = RuleDocument::from_json_str(
            r#"{ "schema": 1, "cases": [
                { "test": { "literal": 1 } },
                { "test": { "pattern": "(unclosed" } }
            ] }"#,
        )
        .expect("parse");
        let err = document
            .compile(&CaseRegistry::new())
            .err()
            .expect("bad pattern");
        assert!(matches!(err, RulesError::InvalidPattern { index: 1, .. }));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let document = RuleDocument::from_json_str(
            r#"{ "schema": 1, "cases": [{ "kind": "divisibleBy", "test": { "literal": 3 } }] }"#,
        )
        .expect("parse");
        let err = document
            .compile(&CaseRegistry::new())
            .err()
            .expect("unknown kind");
        assert!(matches!(
            err,
            RulesError::Kernel(CaselineError::CaseKindUnknown(_))
        ));
    }

    #[test]
    fn kind_bound_to_missing_method_is_invalid_argument() {
        let document = RuleDocument::from_json_str(
            r#"{ "schema": 1, "kinds": [{ "name": "oddOne", "method": "not_in_catalog" }] }"#,
        )
        .expect("parse");
        let err = document
            .compile_with(&catalog())
            .err()
            .expect("missing method");
        assert!(matches!(
            err,
            RulesError::Kernel(CaselineError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn kind_shadowing_builtin_is_duplicate() {
        let document = RuleDocument::from_json_str(
            r#"{ "schema": 1, "kinds": [{ "name": "is", "method": "divisible_by" }] }"#,
        )
        .expect("parse");
        let err = document
            .compile_with(&catalog())
            .err()
            .expect("duplicate");
        assert!(matches!(
            err,
            RulesError::Kernel(CaselineError::DuplicateName(_))
        ));
    }

    #[test]
    fn null_default_leaves_default_unset() {
        let document =
            RuleDocument::from_json_str(r#"{ "schema": 1, "default": null }"#).expect("parse");
        let matcher = document.compile(&CaseRegistry::new()).expect("compile");
        assert!(matcher.default_outcome().is_none());
        assert_eq!(matcher.match_value(&json!(1)), None);
    }
}
