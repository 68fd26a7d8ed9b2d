//! Matcher behavior options.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Options carried by every matcher.
///
/// Keys other than the known ones are kept in `extra`, so merging two
/// option sets behaves like a shallow map merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOptions {
    /// Invoke callback outcomes on match instead of handing them back.
    #[serde(default = "MatchOptions::default_invoke_callable_result")]
    pub invoke_callable_result: bool,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl MatchOptions {
    pub(crate) fn default_invoke_callable_result() -> bool {
        true
    }

    pub fn with_invoke_callable_result(mut self, invoke: bool) -> Self {
        self.invoke_callable_result = invoke;
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Shallow merge: keys from `other` win.
    pub fn merged(&self, other: &Self) -> Self {
        let mut extra = self.extra.clone();
        extra.extend(other.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self {
            invoke_callable_result: other.invoke_callable_result,
            extra,
        }
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            invoke_callable_result: Self::default_invoke_callable_result(),
            extra: BTreeMap::new(),
        }
    }
}
