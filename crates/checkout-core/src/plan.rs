//! Plan → SKU Resolution
//!
//! Storefront links speak in plans (`?plan=2bag`), the catalog speaks in SKUs.
//! The table keeps its insertion order so the "try one of" hint lists plans the
//! way they were configured.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CheckoutError, Result};

/// Normalize a plan key for lookup
pub fn normalize(plan: &str) -> String {
    plan.trim().to_lowercase()
}

/// Ordered, case-insensitive plan → SKU table
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlanTable {
    entries: Vec<(String, String)>,
}

impl PlanTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a plan. The key is stored normalized.
    #[must_use]
    pub fn with(mut self, plan: &str, sku: impl Into<String>) -> Self {
        self.insert(plan, sku);
        self
    }

    pub fn insert(&mut self, plan: &str, sku: impl Into<String>) {
        let key = normalize(plan);
        let sku = sku.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = sku,
            None => self.entries.push((key, sku)),
        }
    }

    /// Look up a plan, ignoring case and surrounding whitespace
    pub fn get(&self, plan: &str) -> Option<&str> {
        let key = normalize(plan);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, sku)| sku.as_str())
    }

    /// Plan keys in table order
    pub fn plans(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pick the SKU for a request.
    ///
    /// A non-empty `sku` is used verbatim and wins over `plan`; it exists so a
    /// SKU can be exercised directly without a plan entry.
    pub fn resolve_sku(&self, plan: Option<&str>, sku: Option<&str>) -> Result<String> {
        if let Some(sku) = sku.filter(|s| !s.is_empty()) {
            return Ok(sku.to_string());
        }

        plan.and_then(|p| self.get(p))
            .map(str::to_string)
            .ok_or_else(|| {
                let options = self.plans().collect::<Vec<_>>().join(", ");
                CheckoutError::BadRequest(format!("Unknown plan. Try one of: {options}"))
            })
    }
}

impl Serialize for PlanTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (plan, sku) in &self.entries {
            map.serialize_entry(plan, sku)?;
        }
        map.end()
    }
}

struct PlanTableVisitor;

impl<'de> Visitor<'de> for PlanTableVisitor {
    type Value = PlanTable;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of plan names to SKUs")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<PlanTable, A::Error> {
        let mut table = PlanTable::new();
        while let Some((plan, sku)) = access.next_entry::<String, String>()? {
            table.insert(&plan, sku);
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for PlanTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(PlanTableVisitor)
    }
}
