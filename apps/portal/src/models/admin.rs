use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Feature flag name to enabled state.
pub type FeatureList = BTreeMap<String, bool>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeFeaturePayload {
    pub key: String,
    pub enabled: bool,
}

impl ChangeFeaturePayload {
    pub fn new(key: impl Into<String>, enabled: bool) -> Self {
        Self {
            key: key.into(),
            enabled,
        }
    }
}
