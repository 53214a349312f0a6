//! Application service supertype
//!
//! Adapts bare DTOs into domain entities, runs them through a domain
//! service and adapts the results into UI DTOs.

use std::any::type_name;
use std::sync::Arc;

use crate::error::ServiceResult;
use crate::services::crud_service::Id;
use crate::services::domain_service::DomainOperations;
use crate::services::type_adapter::TypeAdapter;
use crate::services::LogOnError;

/// Names the related data a UI view needs loaded with each entity.
pub trait NavigationProperties: Send + Sync {
    fn navigation_properties(&self, view: &str) -> Vec<String>;
}

impl<F> NavigationProperties for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn navigation_properties(&self, view: &str) -> Vec<String> {
        self(view)
    }
}

/// Application service over bare DTOs `D`, UI DTOs `U`, domain entities `E`
/// and persistence models `M`.
pub struct ApplicationService<D, U, E, M> {
    domain: Arc<dyn DomainOperations<E, M>>,
    to_domain: Arc<dyn TypeAdapter<D, E>>,
    to_ui: Arc<dyn TypeAdapter<E, U>>,
    navigation: Arc<dyn NavigationProperties>,
}

impl<D, U, E, M> Clone for ApplicationService<D, U, E, M> {
    fn clone(&self) -> Self {
        Self {
            domain: Arc::clone(&self.domain),
            to_domain: Arc::clone(&self.to_domain),
            to_ui: Arc::clone(&self.to_ui),
            navigation: Arc::clone(&self.navigation),
        }
    }
}

impl<D, U, E, M> ApplicationService<D, U, E, M> {
    /// Service that loads no navigation properties for any view.
    pub fn new<TD, TU>(domain: Arc<dyn DomainOperations<E, M>>, to_domain: TD, to_ui: TU) -> Self
    where
        TD: TypeAdapter<D, E> + 'static,
        TU: TypeAdapter<E, U> + 'static,
    {
        Self {
            domain,
            to_domain: Arc::new(to_domain),
            to_ui: Arc::new(to_ui),
            navigation: Arc::new(|_: &str| Vec::<String>::new()),
        }
    }

    pub fn with_navigation<N>(mut self, navigation: N) -> Self
    where
        N: NavigationProperties + 'static,
    {
        self.navigation = Arc::new(navigation);
        self
    }

    pub fn domain(&self) -> &dyn DomainOperations<E, M> {
        self.domain.as_ref()
    }

    /// Adds the entity built from `dto`. Returns `None` when the domain
    /// service reports nothing was added.
    pub fn add(&self, dto: &D) -> ServiceResult<Option<U>> {
        self.try_add(dto).log_error("adding", type_name::<D>())
    }

    pub fn add_many(&self, dtos: &[D]) -> ServiceResult<Vec<Option<U>>> {
        dtos.iter()
            .map(|dto| self.add(dto))
            .collect::<ServiceResult<Vec<_>>>()
            .log_error("adding list of", type_name::<D>())
    }

    /// Edits the entity with `id`. Returns `None` when nothing was edited.
    pub fn edit(&self, id: Id, dto: &D) -> ServiceResult<Option<U>> {
        self.try_edit(id, dto).log_error("editing", type_name::<D>())
    }

    /// Deletes by id, returning the id when deleted and `0` otherwise.
    pub fn delete(&self, id: Id) -> ServiceResult<Id> {
        self.domain.delete(id).log_error("deleting", type_name::<D>())
    }

    pub fn delete_many(&self, dtos: &[D]) -> ServiceResult<Vec<U>> {
        self.try_delete_many(dtos).log_error("deleting", type_name::<D>())
    }

    /// Entities matching `filter`, loaded with the navigation properties of
    /// `view` and adapted into UI DTOs.
    pub fn get(&self, filter: &dyn Fn(&M) -> bool, view: &str) -> ServiceResult<Vec<U>> {
        let navigation = self.navigation.navigation_properties(view);
        let navigation: Vec<&str> = navigation.iter().map(String::as_str).collect();

        self.domain
            .get(filter, &navigation)
            .and_then(|entities| self.to_ui.adapt_all(&entities))
            .log_error("getting", type_name::<U>())
    }

    pub fn navigation_properties(&self, view: &str) -> Vec<String> {
        self.navigation.navigation_properties(view)
    }

    fn try_add(&self, dto: &D) -> ServiceResult<Option<U>> {
        let entity = self.to_domain.adapt(dto)?;
        let (added, stored) = self.domain.add(entity)?;
        self.ui_if(added, &stored)
    }

    fn try_edit(&self, id: Id, dto: &D) -> ServiceResult<Option<U>> {
        let entity = self.to_domain.adapt(dto)?;
        let (edited, stored) = self.domain.edit(id, entity)?;
        self.ui_if(edited, &stored)
    }

    fn try_delete_many(&self, dtos: &[D]) -> ServiceResult<Vec<U>> {
        let entities = self.to_domain.adapt_all(dtos)?;
        self.domain
            .delete_many(entities)?
            .iter()
            .map(|(_, entity)| self.to_ui.adapt(entity))
            .collect()
    }

    fn ui_if(&self, changed: bool, entity: &E) -> ServiceResult<Option<U>> {
        if changed {
            self.to_ui.adapt(entity).map(Some)
        } else {
            Ok(None)
        }
    }
}
