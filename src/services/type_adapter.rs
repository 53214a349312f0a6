//! Type adapters convert one layer's representation into another's.

use crate::error::ServiceResult;

/// Converts `S` into `D`.
///
/// Implemented for every `Fn(&S) -> ServiceResult<D>`, so adapters are
/// usually plain closures or functions.
pub trait TypeAdapter<S, D>: Send + Sync {
    fn adapt(&self, source: &S) -> ServiceResult<D>;

    /// Adapts every element, stopping at the first failure.
    fn adapt_all(&self, sources: &[S]) -> ServiceResult<Vec<D>> {
        sources.iter().map(|source| self.adapt(source)).collect()
    }
}

impl<S, D, F> TypeAdapter<S, D> for F
where
    F: Fn(&S) -> ServiceResult<D> + Send + Sync,
{
    fn adapt(&self, source: &S) -> ServiceResult<D> {
        self(source)
    }
}

/// Adapter backed by a `From` conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct FromAdapter;

impl<S, D> TypeAdapter<S, D> for FromAdapter
where
    S: Clone,
    D: From<S>,
{
    fn adapt(&self, source: &S) -> ServiceResult<D> {
        Ok(D::from(source.clone()))
    }
}
