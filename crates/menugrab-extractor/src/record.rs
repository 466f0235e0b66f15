//! The output data model.

use serde::Serialize;

/// One option group from an item's detail overlay.
///
/// Group order and option order both preserve the overlay's presentation
/// order; a plain vector keeps that stable through serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionGroup {
    pub label: String,
    pub options: Vec<String>,
}

/// One entry per distinct item name observed.
///
/// The detail path yields `option_groups`; the fallback path yields `price`.
/// Both shapes are normalized into this single record form, with absent
/// fields serialized away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuRecord {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_groups: Option<Vec<OptionGroup>>,
}
