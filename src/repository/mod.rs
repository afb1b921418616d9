//! Repositories bound to a single transaction scope.

pub mod movies;
pub mod ratings;
pub mod users;

use crate::cache::{CacheError, ReportCache};
use sea_orm::{DatabaseTransaction, DbErr};
use std::sync::Arc;
use thiserror::Error;

/// Failure modes surfaced by the storage layer.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("database error: {0}")]
    Db(#[from] DbErr),
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// A write that should have affected a row affected none. Signals a
    /// lost update or a stale id; never retried at this layer.
    #[error("data integrity: {0}")]
    DataIntegrity(String),
}

/// All repositories bound to one transaction.
pub struct Repositories<'a> {
    pub movies: movies::MovieRepository<'a>,
    pub users: users::UserRepository<'a>,
    pub ratings: ratings::RatingRepository<'a>,
}

impl<'a> Repositories<'a> {
    pub fn bind(txn: &'a DatabaseTransaction, cache: Arc<dyn ReportCache>) -> Self {
        Self {
            movies: movies::MovieRepository::new(txn),
            users: users::UserRepository::new(txn),
            ratings: ratings::RatingRepository::new(txn, cache),
        }
    }
}
