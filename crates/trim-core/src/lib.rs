//! Decision model, tree rules and sample reconciliation for Trim.
//!
//! Everything in this crate is pure: callers supply the current time and the
//! stored state, and get new state back. Persistence lives in `trim-store`.

pub mod autosave;
pub mod category;
pub mod draft;
pub mod error;
pub mod gesture;
pub mod id;
pub mod model;
pub mod ops;
pub mod preview;
pub mod reconcile;
pub mod sample;
pub mod time;
pub mod tree;
