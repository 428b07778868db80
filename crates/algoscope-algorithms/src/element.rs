//! Array elements as the renderer sees them.

use serde::{Deserialize, Serialize};

/// Highlight applied to one array cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementStatus {
    #[default]
    Default,
    Comparing,
    Pivot,
    Sorted,
    Excluded,
}

/// One array cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Element {
    pub value: i64,
    pub status: ElementStatus,
}

impl Element {
    pub const fn new(value: i64, status: ElementStatus) -> Self {
        Self { value, status }
    }
}

/// Plain cells for every value.
pub fn elements(values: &[i64]) -> Vec<Element> {
    values
        .iter()
        .map(|&value| Element::new(value, ElementStatus::Default))
        .collect()
}

/// Just the values, in order.
pub fn values_of(elements: &[Element]) -> Vec<i64> {
    elements.iter().map(|e| e.value).collect()
}
