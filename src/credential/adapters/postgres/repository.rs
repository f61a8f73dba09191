//! `PostgreSQL` repository implementation for credential storage.

use super::{
    models::{CredentialRow, NewCredentialRow},
    schema::platform_credentials,
};
use crate::credential::domain::{PersistedCredentialData, PlatformCredential, UserId};
use crate::credential::ports::{
    CredentialRepository, CredentialRepositoryError, CredentialRepositoryResult,
};
use crate::hosting::domain::Platform;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by credential adapters.
pub type CredentialPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed credential repository.
#[derive(Debug, Clone)]
pub struct PostgresCredentialRepository {
    pool: CredentialPgPool,
}

impl PostgresCredentialRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: CredentialPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> CredentialRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> CredentialRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(CredentialRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(CredentialRepositoryError::persistence)?
    }
}

#[async_trait]
impl CredentialRepository for PostgresCredentialRepository {
    async fn upsert(&self, credential: &PlatformCredential) -> CredentialRepositoryResult<()> {
        let new_row = to_new_row(credential);
        self.run_blocking(move |connection| {
            diesel::insert_into(platform_credentials::table)
                .values(&new_row)
                .on_conflict((
                    platform_credentials::user_id,
                    platform_credentials::platform,
                ))
                .do_update()
                .set((
                    platform_credentials::access_token.eq(new_row.access_token.clone()),
                    platform_credentials::team_id.eq(new_row.team_id.clone()),
                    platform_credentials::account_id.eq(new_row.account_id.clone()),
                    platform_credentials::updated_at.eq(new_row.updated_at),
                ))
                .execute(connection)
                .map_err(CredentialRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn find(
        &self,
        user_id: UserId,
        platform: Platform,
    ) -> CredentialRepositoryResult<Option<PlatformCredential>> {
        self.run_blocking(move |connection| {
            let row = platform_credentials::table
                .filter(platform_credentials::user_id.eq(user_id.into_inner()))
                .filter(platform_credentials::platform.eq(platform.as_str()))
                .select(CredentialRow::as_select())
                .first::<CredentialRow>(connection)
                .optional()
                .map_err(CredentialRepositoryError::persistence)?;
            row.map(row_to_credential).transpose()
        })
        .await
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> CredentialRepositoryResult<Vec<PlatformCredential>> {
        self.run_blocking(move |connection| {
            let rows = platform_credentials::table
                .filter(platform_credentials::user_id.eq(user_id.into_inner()))
                .order(platform_credentials::platform.asc())
                .select(CredentialRow::as_select())
                .load::<CredentialRow>(connection)
                .map_err(CredentialRepositoryError::persistence)?;
            rows.into_iter().map(row_to_credential).collect()
        })
        .await
    }

    async fn delete(
        &self,
        user_id: UserId,
        platform: Platform,
    ) -> CredentialRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                platform_credentials::table
                    .filter(platform_credentials::user_id.eq(user_id.into_inner()))
                    .filter(platform_credentials::platform.eq(platform.as_str())),
            )
            .execute(connection)
            .map_err(CredentialRepositoryError::persistence)?;
            Ok(removed > 0)
        })
        .await
    }
}

fn to_new_row(credential: &PlatformCredential) -> NewCredentialRow {
    NewCredentialRow {
        user_id: credential.user_id().into_inner(),
        platform: credential.platform().as_str().to_owned(),
        access_token: credential.access_token().to_owned(),
        team_id: credential.team_id().map(str::to_owned),
        account_id: credential.account_id().map(str::to_owned),
        created_at: credential.created_at(),
        updated_at: credential.updated_at(),
    }
}

fn row_to_credential(row: CredentialRow) -> CredentialRepositoryResult<PlatformCredential> {
    let platform = Platform::try_from(row.platform.as_str())
        .map_err(CredentialRepositoryError::persistence)?;
    Ok(PlatformCredential::from_persisted(PersistedCredentialData {
        user_id: UserId::from_uuid(row.user_id),
        platform,
        access_token: row.access_token,
        team_id: row.team_id,
        account_id: row.account_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
