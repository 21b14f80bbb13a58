//! Query identity, query definitions and the three-state query result.

use std::fmt;

use async_trait::async_trait;

use crate::error::AppError;

/// Cache identity of a query: operation name plus effective parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    name: &'static str,
    params: Vec<String>,
}

impl QueryKey {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            params: Vec::new(),
        }
    }

    /// Appends a parameter to the key.
    pub fn with(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)?;
        for param in &self.params {
            write!(f, ":{param}")?;
        }
        Ok(())
    }
}

/// A cacheable read against the backend.
///
/// The raw wire shape stays private to the query: [`Query::select`] turns it
/// into the value that is cached and handed to consumers. Queries are cloned
/// into the in-flight fetch, so they should be cheap handles.
#[async_trait]
pub trait Query: Clone + Send + Sync + 'static {
    type Raw: Send + 'static;
    type Output: Clone + Send + Sync + 'static;

    fn key(&self) -> QueryKey;

    /// Performs the remote call.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] or [`AppError::Remote`].
    async fn fetch(&self) -> Result<Self::Raw, AppError>;

    /// Post-fetch transform applied before caching.
    fn select(&self, raw: Self::Raw) -> Self::Output;

    /// Notification text used when the backend gives no message.
    fn failure_message(&self) -> &'static str {
        "Failed to load data."
    }
}

/// Observable state of one query.
///
/// An empty `Ready` value is a valid result, not a failure.
#[derive(Debug, Clone)]
pub enum QueryState<T> {
    Loading,
    Failed(AppError),
    Ready(T),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryState<U> {
        match self {
            Self::Loading => QueryState::Loading,
            Self::Failed(error) => QueryState::Failed(error),
            Self::Ready(data) => QueryState::Ready(f(data)),
        }
    }
}
