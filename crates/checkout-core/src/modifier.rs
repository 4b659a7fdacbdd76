//! Modifier Resolution
//!
//! Some products carry required modifiers that must be filled in before the
//! platform accepts a cart line. Selections come from one place:
//!
//! 1. an explicit per-SKU override, when configured and non-empty;
//! 2. otherwise the fallback strategy, which may query the product's
//!    modifiers and pick the default (or first) value of each required one.
//!
//! Typed modifiers (text, numbers, date, file) have nothing to pick from and
//! are never guessed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogClient, Modifier, OptionSelection, Variant};
use crate::error::{CheckoutError, Result};

/// Explicit selections per SKU
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifierOverrides {
    selections: HashMap<String, Vec<OptionSelection>>,
}

impl ModifierOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, sku: impl Into<String>, selections: Vec<OptionSelection>) -> Self {
        self.selections.insert(sku.into(), selections);
        self
    }

    /// Configured selections for `sku`, if any non-empty set exists
    pub fn get(&self, sku: &str) -> Option<&[OptionSelection]> {
        self.selections
            .get(sku)
            .map(Vec::as_slice)
            .filter(|s| !s.is_empty())
    }
}

/// What to do when no override applies
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// Send the line item without selections
    #[default]
    Skip,

    /// Look up required modifiers and pick default-or-first values
    DefaultOrFirst,
}

/// Where a set of selections came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionSource {
    Override,
    Upstream,
    Skipped,
}

/// Single decision point for modifier selections
#[derive(Clone, Debug, Default)]
pub struct ModifierResolver {
    overrides: ModifierOverrides,
    fallback: Fallback,
}

impl ModifierResolver {
    pub fn new(overrides: ModifierOverrides, fallback: Fallback) -> Self {
        Self { overrides, fallback }
    }

    /// Selections to send for `sku`
    pub async fn resolve(
        &self,
        catalog: &dyn CatalogClient,
        variant: Variant,
        sku: &str,
    ) -> Result<(Vec<OptionSelection>, SelectionSource)> {
        if let Some(selections) = self.overrides.get(sku) {
            return Ok((selections.to_vec(), SelectionSource::Override));
        }

        match self.fallback {
            Fallback::Skip => Ok((Vec::new(), SelectionSource::Skipped)),
            Fallback::DefaultOrFirst => {
                let modifiers = catalog.product_modifiers(variant.product_id).await?;
                let selections = select_required(&modifiers, sku)?;
                Ok((selections, SelectionSource::Upstream))
            }
        }
    }
}

/// Pick a value for every required modifier.
///
/// Uses the value flagged default, else the first one listed. A required
/// modifier with no values to pick from is a `Configuration` error.
pub fn select_required(modifiers: &[Modifier], sku: &str) -> Result<Vec<OptionSelection>> {
    modifiers
        .iter()
        .filter(|m| m.is_required())
        .map(|modifier| -> Result<OptionSelection> {
            if !modifier.is_multiple_choice() {
                return Err(CheckoutError::Configuration(format!(
                    "Required modifier \"{}\" ({}) on SKU {sku} has no selectable values",
                    modifier.display_name, modifier.kind
                )));
            }

            let value = modifier
                .option_values
                .iter()
                .find(|v| v.is_default)
                .unwrap_or(&modifier.option_values[0]);

            Ok(OptionSelection {
                option_id: modifier.id,
                option_value: value.id,
            })
        })
        .collect()
}
