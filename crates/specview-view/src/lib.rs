//! View layer for specview.
//!
//! Everything a presentation layer needs between the reconciliation core and
//! the screen, as plain data and pure functions: the fork table derived once
//! per artifact, an explicit [`ViewState`], the visible subset of entries for a
//! given state, and deep links.
//!
//! # Key Types
//!
//! - [`ForkTable`] / [`ForkInfo`] -- Included forks in order with display colours
//! - [`ViewState`] -- Search, fork and field filters, dataset choice, toggles
//! - [`VisibleVariable`] / [`VisibleItem`] / [`VisibleComparison`] -- Filtered entries
//! - [`DeepLink`] -- `#field/name@FORK` links

pub mod error;
pub mod fork_table;
pub mod link;
pub mod state;
pub mod visible;

pub use error::{Result, ViewError};
pub use fork_table::{ForkInfo, ForkTable, PALETTE};
pub use link::DeepLink;
pub use state::ViewState;
pub use visible::{
    compute_visible_comparisons, compute_visible_items, compute_visible_variables,
    VisibleComparison, VisibleItem, VisibleVariable,
};
