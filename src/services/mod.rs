//! Service layer supertypes
//!
//! Domain services gate persistence on entity validity and adapt between
//! domain entities and persistence models; application services adapt bare
//! DTOs in and UI DTOs out around a domain service.

pub mod application_service;
pub mod crud_service;
pub mod domain_service;
pub mod type_adapter;

pub use application_service::{ApplicationService, NavigationProperties};
pub use crud_service::{CrudService, Id, Identified, InMemoryCrudService};
pub use domain_service::{DomainOperations, DomainService};
pub use type_adapter::TypeAdapter;

use crate::error::ServiceResult;

/// Logs a failed service operation and hands the error back unchanged.
pub trait LogOnError<T> {
    fn log_error(self, operation: &str, entity: &str) -> ServiceResult<T>;
}

impl<T> LogOnError<T> for ServiceResult<T> {
    fn log_error(self, operation: &str, entity: &str) -> ServiceResult<T> {
        self.inspect_err(|e| {
            tracing::error!(entity = entity, error = %e, "Error {} entity of type {}", operation, entity)
        })
    }
}
