//! JSON Patch implementation (RFC 6902).
//!
//! # Operations
//!
//! `add`, `remove`, `replace`, `copy`, `move`, `test`.
//!
//! Applying an operation yields a [`Change`] record describing what happened
//! to the document; `copy` and `move` are recorded as the `add` they perform
//! and `test` records nothing.

pub mod apply;
pub mod codec;
pub mod types;

pub use apply::{apply_json_patch, apply_op, apply_ops};
pub use codec::{from_json, from_json_patch, to_json};
pub use types::{ApplyError, Change, ChangeKind, Op, PatchError, PatchResult, Path, PathStep};
