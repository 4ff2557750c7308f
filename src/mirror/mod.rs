//! Capability injection: non-blocking mirror operations for mapped models.
//!
//! The mapping layer's blocking surface is consumed through [`ModelOps`];
//! the [`Installer`] registers mirror operations per model type and hands
//! back wrapper types ([`Mirror`], [`MirrorQuery`]) that run each original
//! blocking operation on the worker pool and await it through the bridge.
//! Installation is idempotent and fails fast when a requested operation is
//! not declared by the target type.

mod install;
mod ops;
mod registry;

pub use install::{FilteredMirror, Installer, Mirror, MirrorQuery};
pub use ops::{Filter, ModelOps, Operation};
pub use registry::{OperationRegistry, Surface};
