//! Catalog and Cart Wire Types

use serde::{Deserialize, Serialize};

/// A purchasable variant, as resolved from a SKU
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Upstream `id` of the variant
    pub variant_id: u64,
    pub product_id: u64,
}

/// Product modifier (flavor, size, gift note, ...)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub id: u64,

    #[serde(default)]
    pub display_name: String,

    /// `dropdown`, `radio_buttons`, `text`, `date`, ...
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub required: Option<bool>,

    /// Older API versions spell the flag this way
    #[serde(default)]
    pub is_required: Option<bool>,

    /// Empty for typed inputs (text, numbers, date, file)
    #[serde(default)]
    pub option_values: Vec<ModifierValue>,
}

impl Modifier {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false) || self.is_required.unwrap_or(false)
    }

    /// Whether the shopper picks from enumerated values
    pub fn is_multiple_choice(&self) -> bool {
        !self.option_values.is_empty()
    }
}

/// One selectable value of a multiple-choice modifier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierValue {
    pub id: u64,

    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub is_default: bool,
}

/// A chosen modifier value on a cart line item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSelection {
    pub option_id: u64,
    pub option_value: u64,
}

/// Cart line item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: u64,
    pub variant_id: u64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub option_selections: Vec<OptionSelection>,
}

/// Body of `POST /carts`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartRequest {
    pub channel_id: u64,
    pub line_items: Vec<LineItem>,
}

impl CartRequest {
    /// Single-line cart for one variant
    pub fn single(
        channel_id: u64,
        variant: Variant,
        quantity: u32,
        option_selections: Vec<OptionSelection>,
    ) -> Self {
        Self {
            channel_id,
            line_items: vec![LineItem {
                product_id: variant.product_id,
                variant_id: variant.variant_id,
                quantity,
                option_selections,
            }],
        }
    }
}
