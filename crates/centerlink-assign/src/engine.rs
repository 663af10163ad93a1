//! Assignment engine — runs passes over pending orders.
//!
//! A pass:
//! 1. Loads pending orders and sorts them by id (oldest first)
//! 2. Loads the available centers into a [`WorkingSet`]
//! 3. Matches each order to its nearest compatible center with room,
//!    persisting the center's new load and the order's assignment
//!
//! Capacity claimed by an order is visible to every later order in the
//! same pass. The center lock is held for the whole pass, so passes are
//! serialized with each other and with any center writer sharing the lock.
//!
//! If a save fails the pass stops. The failing order's capacity claim is
//! rolled back (in memory and, best effort, in the store); assignments
//! persisted earlier in the pass are kept and returned in the error.

use std::sync::{Arc, Mutex, PoisonError};

use centerlink_state::{Order, OrderStatus, StateResult};
use tracing::{debug, info, warn};

use crate::candidates::{Candidate, WorkingSet};
use crate::error::{AssignError, AssignResult};
use crate::outcome::ProcessedOrder;
use crate::store::AssignmentStore;

/// Matches pending orders to logistics centers.
pub struct AssignmentEngine<S> {
    store: S,
    /// Guards center records for the whole pass; the working set is a
    /// snapshot that must not go stale under another writer.
    center_lock: Arc<Mutex<()>>,
}

impl<S: AssignmentStore> AssignmentEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_center_lock(store, Arc::new(Mutex::new(())))
    }

    /// Engine that shares `center_lock` with other center writers.
    pub fn with_center_lock(store: S, center_lock: Arc<Mutex<()>>) -> Self {
        Self { store, center_lock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one pass over every pending order.
    ///
    /// Returns one outcome per order pending at the start of the pass, in
    /// ascending order id.
    pub fn assign_orders_to_centers(&self) -> AssignResult<Vec<ProcessedOrder>> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        let _pass = self.center_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut pending = self
            .store
            .find_orders_by_status(OrderStatus::Pending)
            .map_err(AssignError::Load)?;
        pending.sort_by_key(|o| o.id);

        let centers = self.store.find_all_centers().map_err(AssignError::Load)?;
        let mut working = WorkingSet::from_centers(centers);

        info!(
            pending = pending.len(),
            available_centers = working.len(),
            "assignment pass started"
        );

        let mut outcomes = Vec::with_capacity(pending.len());
        for order in pending {
            let order_id = order.id;
            match self.process_order(order, &mut working) {
                Ok(outcome) => outcomes.push(outcome),
                Err(source) => {
                    warn!(order = order_id, completed = outcomes.len(), "assignment pass aborted");
                    return Err(AssignError::Persist {
                        order_id,
                        completed: outcomes,
                        source,
                    });
                }
            }
        }

        let assigned = outcomes.iter().filter(|o| o.is_assigned()).count();
        info!(
            assigned,
            left_pending = outcomes.len() - assigned,
            "assignment pass finished"
        );

        Ok(outcomes)
    }

    fn process_order(&self, order: Order, working: &mut WorkingSet) -> StateResult<ProcessedOrder> {
        match working.select(&order) {
            Ok(candidate) => self.commit(order, candidate, working),
            Err(rejection) => {
                debug!(
                    order = order.id,
                    size = %order.size,
                    reason = rejection.message(),
                    "order left pending"
                );
                Ok(ProcessedOrder::pending(order.id, rejection))
            }
        }
    }

    /// Claim capacity on the chosen center and persist both records.
    fn commit(
        &self,
        mut order: Order,
        candidate: Candidate,
        working: &mut WorkingSet,
    ) -> StateResult<ProcessedOrder> {
        let center = working.reserve(candidate.index).clone();

        if let Err(e) = self.store.save_center(&center) {
            working.release(candidate.index);
            warn!(order = order.id, center = center.id, error = %e, "center save failed");
            return Err(e);
        }

        order.assign_to(&center.name);

        if let Err(e) = self.store.save_order(&order) {
            let previous = working.release(candidate.index);
            warn!(order = order.id, center = previous.id, error = %e, "order save failed, restoring center load");
            if let Err(restore) = self.store.save_center(previous) {
                warn!(center = previous.id, error = %restore, "center load restore failed");
            }
            return Err(e);
        }

        debug!(
            order = order.id,
            center = %center.name,
            distance_km = candidate.distance_km,
            load = center.current_load,
            max = center.max_capacity,
            "order assigned"
        );

        Ok(ProcessedOrder::assigned(
            order.id,
            &center.name,
            candidate.distance_km,
        ))
    }
}
