//! Merge planning for remote route lists.
//!
//! # Responsibilities
//! - Split a remote route list into locked passthrough and business entries
//! - Compose the list to write back from desired routes and locked entries
//!
//! # Design Decisions
//! - Locked entries keep their original relative order, so a catch-all stays last
//! - Business entries are written newest first and ahead of locked entries
//! - Pure functions; no I/O

use serde_json::Value;

use crate::remote::descriptor;
use crate::routes::{LockedPaths, Route};

/// A remote route list split by ownership.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Partition {
    pub locked: Vec<Value>,
    pub business: Vec<Value>,
}

/// Split `remote` into locked and business entries, each in original order.
pub fn partition(remote: Vec<Value>, locked_paths: &LockedPaths) -> Partition {
    let mut parts = Partition::default();
    for entry in remote {
        if locked_paths.covers_matcher(descriptor::matcher_path(&entry)) {
            parts.locked.push(entry);
        } else {
            parts.business.push(entry);
        }
    }
    parts
}

/// Build the list to write: desired routes (given in store order) newest first,
/// then the locked entries unchanged.
pub fn compose<'a, I>(desired: I, locked: &[Value]) -> Vec<Value>
where
    I: IntoIterator<Item = &'a Route>,
    I::IntoIter: DoubleEndedIterator,
{
    desired
        .into_iter()
        .rev()
        .map(descriptor::build)
        .chain(locked.iter().cloned())
        .collect()
}
