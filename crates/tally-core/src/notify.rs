//! # Change Notification
//!
//! The seam between the engine and its observers (UI panels, report
//! builders, SMS dispatch). After every successful mutating operation the
//! responsible store announces which entity kinds changed; collaborators
//! react by re-reading through the normal query paths.
//!
//! Delivery is at-least-once and best-effort. Nothing in the engine blocks
//! on a notification, and a dropped notification loses nothing but a
//! refresh - the store itself is always the source of truth.

use serde::{Deserialize, Serialize};

use crate::types::WarehouseKind;

/// The entity kinds observers can watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Accounts,
    LedgerEntries,
    Stock(WarehouseKind),
    InventoryEntries,
    Deletions,
}

impl EntityKind {
    /// Stable string form for wire formats and log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Accounts => "accounts",
            EntityKind::LedgerEntries => "ledger_entries",
            EntityKind::Stock(kind) => kind.as_str(),
            EntityKind::InventoryEntries => "inventory_entries",
            EntityKind::Deletions => "deletions",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publish interface for "entity kind changed" events.
///
/// Implementations must be cheap and non-blocking; they run inside the
/// recorders' call path, after the transaction committed.
pub trait ChangeNotifier: Send + Sync {
    fn changed(&self, entity: EntityKind);
}

/// A notifier that discards everything. The default when no observer is
/// wired up (batch jobs, tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl ChangeNotifier for NullNotifier {
    fn changed(&self, _entity: EntityKind) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_strings() {
        assert_eq!(EntityKind::Accounts.as_str(), "accounts");
        assert_eq!(
            EntityKind::Stock(WarehouseKind::UsedAppliances).as_str(),
            "used_appliances"
        );
        assert_eq!(EntityKind::Deletions.to_string(), "deletions");
    }

    #[test]
    fn test_null_notifier_is_silent() {
        // Compile-time check that the trait object works.
        let n: &dyn ChangeNotifier = &NullNotifier;
        n.changed(EntityKind::Accounts);
    }
}
