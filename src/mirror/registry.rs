use std::any::TypeId;
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use tracing::debug;

use crate::error::SqlBridgeError;

use super::ops::{ModelOps, Operation};

/// Which surface of a target type a mirror set was installed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// The model type itself.
    Model,
    /// The model's associated query-set type.
    QuerySet,
}

struct Installed {
    type_name: &'static str,
    operations: BTreeSet<Operation>,
}

/// Bookkeeping for installed mirror operations.
///
/// One entry per (target type, surface); installation is idempotent — a
/// second install of the same surface is a no-op, never a duplicate.
#[derive(Default)]
pub struct OperationRegistry {
    installed: Mutex<HashMap<(TypeId, Surface), Installed>>,
}

impl OperationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the mirror operations for `M` on `surface`.
    ///
    /// Returns `true` if this call installed them, `false` if they were
    /// already present (no-op).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any requested operation is not declared by
    /// `M::operations()`.
    pub fn install<M: ModelOps>(
        &self,
        surface: Surface,
        requested: &[Operation],
    ) -> Result<bool, SqlBridgeError> {
        let declared = M::operations();
        for operation in requested {
            if !declared.contains(operation) {
                return Err(SqlBridgeError::ConfigError(format!(
                    "{} does not declare operation `{operation}`",
                    std::any::type_name::<M>()
                )));
            }
        }

        let key = (TypeId::of::<M>(), surface);
        let mut installed = match self.installed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if installed.contains_key(&key) {
            debug!(
                model = std::any::type_name::<M>(),
                "mirror operations already installed, skipping"
            );
            return Ok(false);
        }
        installed.insert(
            key,
            Installed {
                type_name: std::any::type_name::<M>(),
                operations: requested.iter().copied().collect(),
            },
        );
        Ok(true)
    }

    /// Whether `M` has mirrors installed on `surface`.
    #[must_use]
    pub fn is_installed<M: ModelOps>(&self, surface: Surface) -> bool {
        let installed = match self.installed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        installed.contains_key(&(TypeId::of::<M>(), surface))
    }

    /// The operations installed for `M` on `surface`, in stable order.
    #[must_use]
    pub fn installed_operations<M: ModelOps>(&self, surface: Surface) -> Option<Vec<Operation>> {
        let installed = match self.installed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        installed
            .get(&(TypeId::of::<M>(), surface))
            .map(|entry| entry.operations.iter().copied().collect())
    }

    /// Names of every type with installed mirrors, for diagnostics.
    #[must_use]
    pub fn installed_types(&self) -> Vec<&'static str> {
        let installed = match self.installed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut names: Vec<&'static str> =
            installed.values().map(|entry| entry.type_name).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// The number of installed (type, surface) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let installed = match self.installed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        installed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
