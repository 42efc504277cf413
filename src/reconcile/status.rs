//! Route status derivation.
//!
//! # State Transitions
//! ```text
//! pending → active | failed     after apply + probe
//! active | failed → active | failed   re-derived from every probe
//! any → failed (error set)      apply/reload write rejected or unreachable
//! ```
//!
//! # Design Decisions
//! - Status always follows the latest probe for applied routes
//! - A route with an apply error stays failed until a reload applies it;
//!   probes only update `alive` (an inert path may still answer via a catch-all)

use crate::routes::{Route, RouteStatus};

/// Record a successful apply followed by a probe.
pub fn applied(route: &mut Route, alive: bool) {
    route.error = None;
    probed(route, alive);
}

/// Record a probe result.
pub fn probed(route: &mut Route, alive: bool) {
    route.alive = alive;
    if route.is_inert() {
        route.status = RouteStatus::Failed;
        return;
    }
    route.status = if alive {
        RouteStatus::Active
    } else {
        RouteStatus::Failed
    };
}

/// Number of routes per status, in `Pending, Active, Failed` order.
pub fn tally(routes: &[Route]) -> [(RouteStatus, usize); 3] {
    let mut counts = [(RouteStatus::Pending, 0), (RouteStatus::Active, 0), (RouteStatus::Failed, 0)];
    for route in routes {
        if let Some((_, n)) = counts.iter_mut().find(|(status, _)| *status == route.status) {
            *n += 1;
        }
    }
    counts
}

/// Record a failed apply.
pub fn apply_failed(route: &mut Route, reason: impl Into<String>) {
    route.status = RouteStatus::Failed;
    route.alive = false;
    route.error = Some(reason.into());
}
