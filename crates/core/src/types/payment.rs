//! Checkout form data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Checkout form fields as submitted, keyed by field name.
///
/// Stored wholesale and never validated; the invoice view echoes it back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentInfo(BTreeMap<String, String>);

impl PaymentInfo {
    /// Look up a single field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Iterate fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for PaymentInfo
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<BTreeMap<String, String>> for PaymentInfo {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self(fields)
    }
}
