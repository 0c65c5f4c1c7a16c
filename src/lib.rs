//! Tetromerge (workspace facade crate).
//!
//! Re-exports the `tetromerge::{core,engine,types}` public API; the
//! implementation lives in dedicated crates under `crates/`.

pub use tetromerge_core as core;
pub use tetromerge_engine as engine;
pub use tetromerge_types as types;
