//! Domain service supertype
//!
//! Validates domain entities against their ruleset, adapts them into
//! persistence models and delegates storage to a [`CrudService`]. Every
//! failure is logged with the entity type and returned to the caller.

use std::any::type_name;
use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult};
use crate::functional::validation_engine::Ruleset;
use crate::services::crud_service::{CrudService, Id};
use crate::services::type_adapter::TypeAdapter;
use crate::services::LogOnError;
use crate::utils::error_sink::{ErrorSink, TracingSink};

/// Operations of a domain service over entities `E` persisted as models `M`.
pub trait DomainOperations<E, M>: Send + Sync {
    /// Validates and stores `entity`, returning `(added, stored entity)`.
    fn add(&self, entity: E) -> ServiceResult<(bool, E)>;

    /// Adds each entity in turn, stopping at the first error.
    fn add_many(&self, entities: Vec<E>) -> ServiceResult<Vec<(bool, E)>>;

    fn edit(&self, id: Id, entity: E) -> ServiceResult<(bool, E)>;

    /// Deletes by id, returning the id when a row was deleted and `0`
    /// otherwise.
    fn delete(&self, id: Id) -> ServiceResult<Id>;

    fn delete_many(&self, entities: Vec<E>) -> ServiceResult<Vec<(bool, E)>>;

    fn get(&self, filter: &dyn Fn(&M) -> bool, navigation: &[&str]) -> ServiceResult<Vec<E>>;

    fn validation_rules(&self) -> &Ruleset<E>;
}

/// Generic [`DomainOperations`] implementation.
///
/// # Examples
///
/// ```
/// let service = DomainService::new(
///     Arc::new(InMemoryCrudService::new()),
///     |c: &Customer| -> ServiceResult<CustomerRow> { Ok(CustomerRow::from(c)) },
///     |r: &CustomerRow| -> ServiceResult<Customer> { Ok(Customer::from(r)) },
///     customer_rules(),
/// );
/// let (added, customer) = service.add(customer)?;
/// ```
pub struct DomainService<E, M> {
    crud: Arc<dyn CrudService<M>>,
    to_model: Arc<dyn TypeAdapter<E, M>>,
    to_domain: Arc<dyn TypeAdapter<M, E>>,
    rules: Arc<Ruleset<E>>,
    sink: Arc<dyn ErrorSink>,
}

impl<E, M> Clone for DomainService<E, M> {
    fn clone(&self) -> Self {
        Self {
            crud: Arc::clone(&self.crud),
            to_model: Arc::clone(&self.to_model),
            to_domain: Arc::clone(&self.to_domain),
            rules: Arc::clone(&self.rules),
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<E, M> DomainService<E, M> {
    /// Validation messages go to a [`TracingSink`] tagged with the entity
    /// type unless replaced through [`DomainService::with_sink`].
    pub fn new<TM, TD>(crud: Arc<dyn CrudService<M>>, to_model: TM, to_domain: TD, rules: Ruleset<E>) -> Self
    where
        TM: TypeAdapter<E, M> + 'static,
        TD: TypeAdapter<M, E> + 'static,
    {
        Self {
            crud,
            to_model: Arc::new(to_model),
            to_domain: Arc::new(to_domain),
            rules: Arc::new(rules),
            sink: Arc::new(TracingSink::for_entity::<E>()),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Validates and stores related entities through their own collaborator.
    ///
    /// Every entity is validated before anything is stored. Returns `true`
    /// when every add reported a change.
    pub fn add_related<R>(
        &self,
        crud: &dyn CrudService<R>,
        rules: &Ruleset<R>,
        entities: Vec<R>,
    ) -> ServiceResult<bool> {
        self.store_related(crud, rules, entities)
            .log_error("adding related", type_name::<R>())
    }

    /// Deletes related entities through their own collaborator. Returns
    /// `true` when every delete reported a change.
    pub fn delete_related<R>(&self, crud: &dyn CrudService<R>, entities: Vec<R>) -> ServiceResult<bool> {
        let mut all_deleted = true;
        for entity in entities {
            let (deleted, _) = crud
                .delete(entity)
                .log_error("deleting related", type_name::<R>())?;
            all_deleted &= deleted;
        }
        Ok(all_deleted)
    }

    fn store_related<R>(
        &self,
        crud: &dyn CrudService<R>,
        rules: &Ruleset<R>,
        entities: Vec<R>,
    ) -> ServiceResult<bool> {
        for entity in &entities {
            ensure_valid(rules, entity, self.sink.as_ref())?;
        }
        let mut all_added = true;
        for entity in entities {
            let (added, _) = crud.add(entity)?;
            all_added &= added;
        }
        Ok(all_added)
    }

    fn store(&self, entity: &E, id: Option<Id>) -> ServiceResult<(bool, E)> {
        ensure_valid(&self.rules, entity, self.sink.as_ref())?;
        let model = self.to_model.adapt(entity)?;
        let (changed, stored) = match id {
            Some(id) => self.crud.edit(id, model)?,
            None => self.crud.add(model)?,
        };
        Ok((changed, self.to_domain.adapt(&stored)?))
    }
}

impl<E, M> DomainOperations<E, M> for DomainService<E, M> {
    fn add(&self, entity: E) -> ServiceResult<(bool, E)> {
        self.store(&entity, None).log_error("adding", type_name::<E>())
    }

    fn add_many(&self, entities: Vec<E>) -> ServiceResult<Vec<(bool, E)>> {
        entities
            .into_iter()
            .map(|entity| self.add(entity))
            .collect::<ServiceResult<Vec<_>>>()
            .log_error("adding list of", type_name::<E>())
    }

    fn edit(&self, id: Id, entity: E) -> ServiceResult<(bool, E)> {
        self.store(&entity, Some(id)).log_error("editing", type_name::<E>())
    }

    fn delete(&self, id: Id) -> ServiceResult<Id> {
        self.crud
            .delete_by_id(id)
            .map(|(deleted, _)| if deleted { id } else { 0 })
            .log_error("deleting", type_name::<E>())
    }

    fn delete_many(&self, entities: Vec<E>) -> ServiceResult<Vec<(bool, E)>> {
        entities
            .iter()
            .map(|entity| -> ServiceResult<(bool, E)> {
                let model = self.to_model.adapt(entity)?;
                let (deleted, removed) = self.crud.delete(model)?;
                Ok((deleted, self.to_domain.adapt(&removed)?))
            })
            .collect::<ServiceResult<Vec<_>>>()
            .log_error("deleting", type_name::<E>())
    }

    fn get(&self, filter: &dyn Fn(&M) -> bool, navigation: &[&str]) -> ServiceResult<Vec<E>> {
        self.crud
            .get(filter, navigation)
            .and_then(|models| self.to_domain.adapt_all(&models))
            .log_error("getting", type_name::<E>())
    }

    fn validation_rules(&self) -> &Ruleset<E> {
        &self.rules
    }
}

fn ensure_valid<T>(rules: &Ruleset<T>, entity: &T, sink: &dyn ErrorSink) -> ServiceResult<()> {
    let outcome = rules.validate(entity, sink)?;
    if outcome.result {
        Ok(())
    } else {
        Err(ServiceError::invalid_entity::<T>(outcome.error_messages()))
    }
}
