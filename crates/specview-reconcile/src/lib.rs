//! Reconciliation core for specview.
//!
//! Turns one dataset's per-revision raw records into a normalized model
//! (base value plus the ordered overrides that changed it), and merges two
//! such models into comparison rows. Every function here is pure: identical
//! input always yields identical output, and malformed records degrade to
//! documented sentinels instead of failing.
//!
//! # Key Types
//!
//! - [`ParsedName`] -- Base name plus optional revision suffix
//! - [`ParsedValue`] -- `(type, value)` extracted from a variable record
//! - [`VariableSet`] / [`BaseEntity`] / [`OverrideEntry`] -- Reconciled variables
//! - [`ItemHistory`] / [`ItemChange`] -- Reconciled item change lists
//! - [`ComparisonRow`] / [`Lookup`] -- Cross-dataset comparison

pub mod items;
pub mod name;
pub mod rows;
pub mod value;
pub mod variables;

pub use items::{
    item_change_pairs, item_value_at, reconcile_items, reconcile_items_with, ItemChange,
    ItemHistory,
};
pub use name::{parse_entity_name, ParsedName};
pub use rows::{
    build_comparison_rows, build_comparison_rows_with, build_comparison_table,
    build_comparison_table_with, effective_value_at, ComparisonRow, Lookup,
};
pub use value::{parse_value, ParsedValue, MISSING_VALUE, UNKNOWN_TYPE};
pub use variables::{
    reconcile_variables, reconcile_variables_with, BaseEntity, OverrideEntry, VariableSet,
};
