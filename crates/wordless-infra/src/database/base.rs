use std::marker::PhantomData;

use sea_orm::{DbConn, DbErr, EntityTrait};

use wordless_core::error::RepoError;

/// Generic SeaORM-backed repository, one per entity.
///
/// The concrete repositories are type aliases over this struct with their
/// port traits implemented per entity.
pub struct SeaRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> SeaRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

impl<E> Clone for SeaRepository<E>
where
    E: EntityTrait,
{
    fn clone(&self) -> Self {
        Self::new(self.db.clone())
    }
}

/// Map a statement error, singling out constraint violations.
pub(crate) fn query_error(err: DbErr) -> RepoError {
    let err_str = err.to_string();
    let lowered = err_str.to_lowercase();
    if lowered.contains("duplicate") || lowered.contains("unique") || lowered.contains("foreign key")
    {
        RepoError::Constraint(err_str)
    } else {
        RepoError::Query(err_str)
    }
}

pub(crate) fn transaction_error(err: DbErr) -> RepoError {
    RepoError::Transaction(err.to_string())
}
