//! Candidate selection over the in-pass working set.
//!
//! The working set holds the available centers for the duration of one
//! pass, ordered by ascending center id. Selection narrows it down in two
//! steps:
//! 1. Compatibility: the center's capacity class contains the order's size
//! 2. Room: `current_load < max_capacity`
//!
//! and then picks the nearest remaining center. On exactly equal distances
//! the lowest center id wins.

use centerlink_state::{Center, Order};

use crate::distance::haversine_km;

/// Why an order could not be matched in this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No available center serves the order's size.
    Unsupported,
    /// Compatible centers exist but all of them are full.
    AtCapacity,
}

impl Rejection {
    /// User-facing explanation attached to the pending outcome.
    pub fn message(self) -> &'static str {
        match self {
            Rejection::Unsupported => "No available centers support the order type.",
            Rejection::AtCapacity => "All centers are at maximum capacity.",
        }
    }
}

/// The nearest eligible center for an order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Position in the working set.
    pub index: usize,
    pub distance_km: f64,
}

/// Available centers, mutated in place as orders claim capacity.
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    centers: Vec<Center>,
}

impl WorkingSet {
    /// Build the working set from every known center.
    ///
    /// Centers that are not available are dropped entirely, whatever their
    /// capacity.
    pub fn from_centers(centers: Vec<Center>) -> Self {
        let mut centers: Vec<Center> = centers.into_iter().filter(Center::is_available).collect();
        centers.sort_by_key(|c| c.id);
        Self { centers }
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    pub fn centers(&self) -> &[Center] {
        &self.centers
    }

    pub fn get(&self, index: usize) -> Option<&Center> {
        self.centers.get(index)
    }

    /// Pick the nearest compatible center with room for `order`.
    pub fn select(&self, order: &Order) -> Result<Candidate, Rejection> {
        let mut compatible = self
            .centers
            .iter()
            .enumerate()
            .filter(|(_, c)| c.supports(&order.size))
            .peekable();

        if compatible.peek().is_none() {
            return Err(Rejection::Unsupported);
        }

        let mut best: Option<Candidate> = None;
        for (index, center) in compatible.filter(|(_, c)| c.has_room()) {
            let distance_km = haversine_km(order.coordinates, center.coordinates);
            // Strict comparison keeps the lowest id on ties.
            if best.is_none_or(|b| distance_km < b.distance_km) {
                best = Some(Candidate { index, distance_km });
            }
        }

        best.ok_or(Rejection::AtCapacity)
    }

    /// Claim one unit of capacity on the center at `index` and return its
    /// updated state.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn reserve(&mut self, index: usize) -> &Center {
        let center = &mut self.centers[index];
        center.current_load += 1;
        center
    }

    /// Give back a unit claimed by [`WorkingSet::reserve`].
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn release(&mut self, index: usize) -> &Center {
        let center = &mut self.centers[index];
        center.current_load = center.current_load.saturating_sub(1);
        center
    }
}
