//! # Caseline Rules
//!
//! Declarative rule documents (JSON or TOML) compiled into
//! [`caseline_kernel::Matcher`]s over [`serde_json::Value`] subjects.
//!
//! Custom case kinds in a document name a method from a [`MethodCatalog`];
//! the built-in `is` and `not` kinds need no catalog entry.
//!
//! ```
//! use caseline_rules::{MethodCatalog, RuleDocument};
//! use serde_json::json;
//!
//! let document = RuleDocument::from_json_str(r#"{
//!     "schema": 1,
//!     "cases": [{ "test": { "literal": "ok" }, "result": 200 }],
//!     "default": 500
//! }"#).unwrap();
//! let matcher = document.compile_with(&MethodCatalog::new()).unwrap();
//!
//! assert_eq!(matcher.match_value(&json!("ok")), Some(json!(200)));
//! assert_eq!(matcher.match_value(&json!("err")), Some(json!(500)));
//! ```

pub mod catalog;
pub mod document;
pub mod error;

pub use catalog::MethodCatalog;
pub use document::{CaseRow, KindRow, RULE_DOCUMENT_SCHEMA, RuleDocument, TestRow};
pub use error::RulesError;
