//! Blockfall (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so the binary, integration
//! tests and benches can use `blockfall::{core,adapter,term,input,types}`.

pub use blockfall_adapter as adapter;
pub use blockfall_core as core;
pub use blockfall_input as input;
pub use blockfall_term as term;
pub use blockfall_types as types;
