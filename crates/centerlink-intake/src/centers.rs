//! Center management — create, list, patch, delete.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use centerlink_state::{Center, CenterId, CenterStatus, Coordinates, NewCenter, StateStore};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{IntakeError, IntakeResult};
use crate::validate;

/// Partial center update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CenterPatch {
    pub name: Option<String>,
    pub capacity: Option<String>,
    pub status: Option<CenterStatus>,
    pub max_capacity: Option<u32>,
    pub current_load: Option<u32>,
    pub coordinates: Option<Coordinates>,
}

impl CenterPatch {
    fn apply(self, center: &mut Center) {
        if let Some(name) = self.name {
            center.name = name;
        }
        if let Some(capacity) = self.capacity {
            center.capacity = capacity;
        }
        if let Some(status) = self.status {
            center.status = status;
        }
        if let Some(max_capacity) = self.max_capacity {
            center.max_capacity = max_capacity;
        }
        if let Some(current_load) = self.current_load {
            center.current_load = current_load;
        }
        if let Some(coordinates) = self.coordinates {
            center.coordinates = coordinates;
        }
    }
}

/// Validating front for center records.
#[derive(Clone)]
pub struct CenterService {
    store: StateStore,
    /// Serializes center writes with each other and, when shared, with
    /// assignment passes.
    write_lock: Arc<Mutex<()>>,
}

impl CenterService {
    pub fn new(store: StateStore) -> Self {
        Self::with_write_lock(store, Arc::new(Mutex::new(())))
    }

    /// Service whose writes wait on `write_lock`; pass the assignment
    /// engine's center lock so no write lands mid-pass.
    pub fn with_write_lock(store: StateStore, write_lock: Arc<Mutex<()>>) -> Self {
        Self { store, write_lock }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate and store a new center.
    pub fn create_center(&self, new: NewCenter) -> IntakeResult<Center> {
        validate::non_empty("name", &new.name)?;
        validate::non_empty("capacity", &new.capacity)?;
        validate::coordinates(new.coordinates)?;
        validate::load_within_capacity(new.current_load, new.max_capacity)?;

        let _guard = self.lock();
        if let Some(existing) = self.store.find_center_at(new.coordinates)? {
            warn!(existing = existing.id, "center position already taken");
            return Err(IntakeError::DuplicatePosition {
                existing: existing.id,
            });
        }

        let center = self.store.insert_center(new)?;
        info!(id = center.id, name = %center.name, "logistics center created");
        Ok(center)
    }

    pub fn list_centers(&self) -> IntakeResult<Vec<Center>> {
        Ok(self.store.list_centers()?)
    }

    /// Apply a partial update, re-checking position and load afterwards.
    pub fn update_center(&self, id: CenterId, patch: CenterPatch) -> IntakeResult<Center> {
        let _guard = self.lock();

        let mut center = self
            .store
            .get_center(id)?
            .ok_or(IntakeError::CenterNotFound(id))?;

        if let Some(coordinates) = patch.coordinates {
            validate::coordinates(coordinates)?;
            if let Some(other) = self.store.find_center_at(coordinates)?
                && other.id != id
            {
                return Err(IntakeError::DuplicatePosition { existing: other.id });
            }
        }

        patch.apply(&mut center);
        validate::non_empty("name", &center.name)?;
        validate::non_empty("capacity", &center.capacity)?;
        validate::load_within_capacity(center.current_load, center.max_capacity)?;

        self.store.put_center(&center)?;
        info!(id, "logistics center updated");
        Ok(center)
    }

    /// Delete a center. Returns whether it existed.
    pub fn delete_center(&self, id: CenterId) -> IntakeResult<bool> {
        let _guard = self.lock();
        let existed = self.store.delete_center(id)?;
        info!(id, existed, "logistics center deleted");
        Ok(existed)
    }
}
