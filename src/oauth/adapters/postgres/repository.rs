//! `PostgreSQL` repository implementation for OAuth state storage.

use super::{
    models::{NewOAuthStateRow, OAuthStateRow},
    schema::oauth_states,
};
use crate::credential::domain::UserId;
use crate::hosting::domain::Platform;
use crate::oauth::domain::{OAuthState, PersistedStateData, StateId};
use crate::oauth::ports::{StateRepository, StateRepositoryError, StateRepositoryResult};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by OAuth state adapters.
pub type StatePgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed OAuth state repository.
#[derive(Debug, Clone)]
pub struct PostgresStateRepository {
    pool: StatePgPool,
}

impl PostgresStateRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: StatePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> StateRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StateRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(StateRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(StateRepositoryError::persistence)?
    }
}

#[async_trait]
impl StateRepository for PostgresStateRepository {
    async fn store(&self, state: &OAuthState) -> StateRepositoryResult<()> {
        let new_row = NewOAuthStateRow {
            id: state.id().into_inner(),
            user_id: state.user_id().into_inner(),
            platform: state.platform().as_str().to_owned(),
            state_token: state.token().to_owned(),
            expires_at: state.expires_at(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(oauth_states::table)
                .values(&new_row)
                .execute(connection)
                .map_err(StateRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn take(
        &self,
        token: &str,
        user_id: UserId,
        platform: Platform,
    ) -> StateRepositoryResult<Option<OAuthState>> {
        let lookup_token = token.to_owned();
        self.run_blocking(move |connection| {
            // Delete-returning keeps lookup and consumption one statement, so
            // two racing callbacks cannot both see the same token.
            let row = diesel::delete(
                oauth_states::table
                    .filter(oauth_states::state_token.eq(lookup_token.clone()))
                    .filter(oauth_states::user_id.eq(user_id.into_inner()))
                    .filter(oauth_states::platform.eq(platform.as_str())),
            )
            .returning(OAuthStateRow::as_returning())
            .get_result::<OAuthStateRow>(connection)
            .optional()
            .map_err(StateRepositoryError::persistence)?;
            row.map(row_to_state).transpose()
        })
        .await
    }
}

fn row_to_state(row: OAuthStateRow) -> StateRepositoryResult<OAuthState> {
    let platform =
        Platform::try_from(row.platform.as_str()).map_err(StateRepositoryError::persistence)?;
    Ok(OAuthState::from_persisted(PersistedStateData {
        id: StateId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        platform,
        token: row.state_token,
        expires_at: row.expires_at,
    }))
}
