//! Header alias tables.
//!
//! These lists are a compatibility contract with the spreadsheets people
//! already send: adding a variant is safe, removing or renaming one breaks
//! existing uploads.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const ORDER_NO_ALIASES: &[&str] = &[
    "order no",
    "order no.",
    "orderno",
    "order number",
    "order #",
    "order",
    "sr no",
    "sr no.",
    "serial no",
];

pub const DESIGN_ALIASES: &[&str] = &[
    "design",
    "design code",
    "designcode",
    "design no",
    "design no.",
    "item",
    "item code",
    "product",
    "code",
    "style",
];

pub const WEIGHT_ALIASES: &[&str] = &[
    "weight",
    "wt",
    "wt.",
    "net wt",
    "net wt.",
    "net weight",
    "gross wt",
    "gross weight",
    "netwt",
];

pub const SIZE_ALIASES: &[&str] = &["size", "sz", "sz.", "dimension", "dimensions", "dim"];

pub const QUANTITY_ALIASES: &[&str] = &[
    "quantity", "qty", "qty.", "quan", "quan.", "count", "pieces", "pcs", "nos",
];

pub const REMARKS_ALIASES: &[&str] = &[
    "remarks",
    "remark",
    "remark's",
    "note",
    "notes",
    "comment",
    "comments",
    "description",
    "desc",
    "rmks",
];

pub const KARIGAR_ALIASES: &[&str] = &["karigar", "artisan", "worker", "craftsman", "maker"];

pub const GENERIC_NAME_ALIASES: &[&str] = &[
    "name",
    "product name",
    "generic",
    "generic name",
    "item name",
    "description",
];

/// A logical column the parsers look for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    OrderNo,
    Design,
    Weight,
    Size,
    Quantity,
    Remarks,
    Karigar,
    GenericName,
}

impl LogicalField {
    pub const MAPPING_FIELDS: [LogicalField; 3] = [
        LogicalField::Design,
        LogicalField::Karigar,
        LogicalField::GenericName,
    ];

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            LogicalField::OrderNo => ORDER_NO_ALIASES,
            LogicalField::Design => DESIGN_ALIASES,
            LogicalField::Weight => WEIGHT_ALIASES,
            LogicalField::Size => SIZE_ALIASES,
            LogicalField::Quantity => QUANTITY_ALIASES,
            LogicalField::Remarks => REMARKS_ALIASES,
            LogicalField::Karigar => KARIGAR_ALIASES,
            LogicalField::GenericName => GENERIC_NAME_ALIASES,
        }
    }

    /// Column name as shown in order-upload messages.
    pub fn label(self) -> &'static str {
        match self {
            LogicalField::OrderNo => "Order No",
            LogicalField::Design => "Design",
            LogicalField::Weight => "Weight",
            LogicalField::Size => "Size",
            LogicalField::Quantity => "Quantity",
            LogicalField::Remarks => "Remarks",
            LogicalField::Karigar => "Karigar",
            LogicalField::GenericName => "Generic Name",
        }
    }

    /// Column name as shown in mapping-upload messages.
    pub fn mapping_label(self) -> &'static str {
        match self {
            LogicalField::Design => "Design Code",
            LogicalField::Karigar => "Karigar Name",
            other => other.label(),
        }
    }

    /// Fields whose cells are never a bare numeric ratio like `"3+1"`.
    pub fn rejects_numeric_ratio(self) -> bool {
        matches!(self, LogicalField::GenericName)
    }
}
