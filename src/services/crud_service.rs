//! CRUD collaborator
//!
//! Domain services delegate storage to a [`CrudService`]. Every mutating
//! operation reports whether it changed anything alongside the affected row.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::error::{ServiceError, ServiceResult};

pub type Id = i64;

/// Models with an integer identity.
pub trait Identified {
    fn id(&self) -> Id;
    fn set_id(&mut self, id: Id);
}

/// Storage operations over persistence models of type `M`.
pub trait CrudService<M>: Send + Sync {
    /// Stores a new row, returning `(added, stored row)`.
    fn add(&self, model: M) -> ServiceResult<(bool, M)>;

    /// Replaces the row with `id`, returning `(edited, row)`.
    fn edit(&self, id: Id, model: M) -> ServiceResult<(bool, M)>;

    fn delete_by_id(&self, id: Id) -> ServiceResult<(bool, Option<M>)>;

    fn delete(&self, model: M) -> ServiceResult<(bool, M)>;

    /// Rows matching `filter`. `navigation` names the related data to load
    /// with each row.
    fn get(&self, filter: &dyn Fn(&M) -> bool, navigation: &[&str]) -> ServiceResult<Vec<M>>;
}

/// [`CrudService`] over an in-process ordered map.
///
/// Ids are assigned from a counter when a model arrives with id `0`.
/// Rows hold their relations inline, so navigation names are accepted and
/// ignored.
#[derive(Debug)]
pub struct InMemoryCrudService<M> {
    rows: Mutex<BTreeMap<Id, M>>,
    next_id: AtomicI64,
}

impl<M> Default for InMemoryCrudService<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> InMemoryCrudService<M> {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.rows().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn rows(&self) -> ServiceResult<MutexGuard<'_, BTreeMap<Id, M>>> {
        self.rows
            .lock()
            .map_err(|_| ServiceError::persistence("In-memory store lock poisoned"))
    }
}

impl<M: Identified + Clone> InMemoryCrudService<M> {
    /// Store seeded with `rows`; rows with id `0` receive fresh ids.
    pub fn with_rows<I: IntoIterator<Item = M>>(rows: I) -> ServiceResult<Self> {
        let store = Self::new();
        for row in rows {
            store.insert(row)?;
        }
        Ok(store)
    }

    pub fn find(&self, id: Id) -> ServiceResult<Option<M>> {
        Ok(self.rows()?.get(&id).cloned())
    }

    fn insert(&self, mut model: M) -> ServiceResult<(bool, M)> {
        let mut rows = self.rows()?;

        if model.id() == 0 {
            model.set_id(self.next_id.fetch_add(1, Ordering::SeqCst));
        } else if rows.contains_key(&model.id()) {
            log::debug!("Row {} already stored, not adding", model.id());
            return Ok((false, model));
        } else {
            self.next_id
                .fetch_max(model.id().saturating_add(1), Ordering::SeqCst);
        }

        rows.insert(model.id(), model.clone());
        Ok((true, model))
    }
}

impl<M> CrudService<M> for InMemoryCrudService<M>
where
    M: Identified + Clone + Send,
{
    fn add(&self, model: M) -> ServiceResult<(bool, M)> {
        self.insert(model)
    }

    fn edit(&self, id: Id, mut model: M) -> ServiceResult<(bool, M)> {
        let mut rows = self.rows()?;
        match rows.get_mut(&id) {
            Some(row) => {
                model.set_id(id);
                *row = model.clone();
                Ok((true, model))
            }
            None => {
                log::debug!("Row {} not found, nothing to edit", id);
                Ok((false, model))
            }
        }
    }

    fn delete_by_id(&self, id: Id) -> ServiceResult<(bool, Option<M>)> {
        let removed = self.rows()?.remove(&id);
        Ok((removed.is_some(), removed))
    }

    fn delete(&self, model: M) -> ServiceResult<(bool, M)> {
        match self.rows()?.remove(&model.id()) {
            Some(removed) => Ok((true, removed)),
            None => Ok((false, model)),
        }
    }

    fn get(&self, filter: &dyn Fn(&M) -> bool, navigation: &[&str]) -> ServiceResult<Vec<M>> {
        if !navigation.is_empty() {
            log::debug!("Navigation properties {:?} are stored inline", navigation);
        }
        Ok(self
            .rows()?
            .values()
            .filter(|row| filter(row))
            .cloned()
            .collect())
    }
}
