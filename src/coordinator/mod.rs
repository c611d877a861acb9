//! Restore and save phase coordinators
//!
//! One job runs the restore coordinator once early and the save coordinator
//! once later, possibly in a different process. The two only communicate
//! through the persisted state store.

pub mod restore;
pub mod save;

pub use restore::{RestoreCoordinator, RestoreOutcome};
pub use save::SaveCoordinator;
