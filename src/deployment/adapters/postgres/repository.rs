//! `PostgreSQL` repository implementation for deployment history storage.

use super::{
    models::{HistoryRow, NewHistoryRow},
    schema::deployment_history,
};
use crate::deployment::domain::{
    DeploymentHistory, DeploymentId, DeploymentStatus, PersistedHistoryData, TriggerSource,
};
use crate::deployment::ports::{
    DeploymentHistoryError, DeploymentHistoryRepository, DeploymentHistoryResult,
};
use crate::project::domain::ProjectId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by history adapters.
pub type HistoryPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed deployment history repository.
#[derive(Debug, Clone)]
pub struct PostgresDeploymentHistoryRepository {
    pool: HistoryPgPool,
}

impl PostgresDeploymentHistoryRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: HistoryPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> DeploymentHistoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> DeploymentHistoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(DeploymentHistoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(DeploymentHistoryError::persistence)?
    }
}

#[async_trait]
impl DeploymentHistoryRepository for PostgresDeploymentHistoryRepository {
    async fn insert(&self, history: &DeploymentHistory) -> DeploymentHistoryResult<()> {
        let new_row = to_new_row(history);
        let project_id = history.project_id();
        let external_id = history.external_deployment_id().to_owned();
        self.run_blocking(move |connection| {
            diesel::insert_into(deployment_history::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        DeploymentHistoryError::DuplicateDeployment {
                            project_id,
                            external_deployment_id: external_id.clone(),
                        }
                    }
                    _ => DeploymentHistoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, history: &DeploymentHistory) -> DeploymentHistoryResult<()> {
        let record_id = history.id();
        let new_row = to_new_row(history);
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                deployment_history::table
                    .filter(deployment_history::id.eq(record_id.into_inner())),
            )
            .set((
                deployment_history::status.eq(new_row.status.clone()),
                deployment_history::deployment_url.eq(new_row.deployment_url.clone()),
                deployment_history::preview_url.eq(new_row.preview_url.clone()),
                deployment_history::error_message.eq(new_row.error_message.clone()),
                deployment_history::completed_at.eq(new_row.completed_at),
            ))
            .execute(connection)
            .map_err(DeploymentHistoryError::persistence)?;

            if updated == 0 {
                return Err(DeploymentHistoryError::NotFound(record_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: DeploymentId,
    ) -> DeploymentHistoryResult<Option<DeploymentHistory>> {
        self.run_blocking(move |connection| {
            let row = deployment_history::table
                .filter(deployment_history::id.eq(id.into_inner()))
                .select(HistoryRow::as_select())
                .first::<HistoryRow>(connection)
                .optional()
                .map_err(DeploymentHistoryError::persistence)?;
            row.map(row_to_history).transpose()
        })
        .await
    }

    async fn find_by_external_id(
        &self,
        project_id: ProjectId,
        external_deployment_id: &str,
    ) -> DeploymentHistoryResult<Option<DeploymentHistory>> {
        let external = external_deployment_id.to_owned();
        self.run_blocking(move |connection| {
            let row = deployment_history::table
                .filter(deployment_history::project_id.eq(project_id.into_inner()))
                .filter(deployment_history::external_deployment_id.eq(external.clone()))
                .select(HistoryRow::as_select())
                .first::<HistoryRow>(connection)
                .optional()
                .map_err(DeploymentHistoryError::persistence)?;
            row.map(row_to_history).transpose()
        })
        .await
    }

    async fn find_latest_for_project(
        &self,
        project_id: ProjectId,
    ) -> DeploymentHistoryResult<Option<DeploymentHistory>> {
        self.run_blocking(move |connection| {
            let row = deployment_history::table
                .filter(deployment_history::project_id.eq(project_id.into_inner()))
                .order(deployment_history::started_at.desc())
                .select(HistoryRow::as_select())
                .first::<HistoryRow>(connection)
                .optional()
                .map_err(DeploymentHistoryError::persistence)?;
            row.map(row_to_history).transpose()
        })
        .await
    }

    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> DeploymentHistoryResult<Vec<DeploymentHistory>> {
        self.run_blocking(move |connection| {
            let rows = deployment_history::table
                .filter(deployment_history::project_id.eq(project_id.into_inner()))
                .order(deployment_history::started_at.desc())
                .select(HistoryRow::as_select())
                .load::<HistoryRow>(connection)
                .map_err(DeploymentHistoryError::persistence)?;
            rows.into_iter().map(row_to_history).collect()
        })
        .await
    }

    async fn delete_for_project(&self, project_id: ProjectId) -> DeploymentHistoryResult<usize> {
        self.run_blocking(move |connection| {
            diesel::delete(
                deployment_history::table
                    .filter(deployment_history::project_id.eq(project_id.into_inner())),
            )
            .execute(connection)
            .map_err(DeploymentHistoryError::persistence)
        })
        .await
    }
}

fn to_new_row(history: &DeploymentHistory) -> NewHistoryRow {
    NewHistoryRow {
        id: history.id().into_inner(),
        project_id: history.project_id().into_inner(),
        external_deployment_id: history.external_deployment_id().to_owned(),
        status: history.status().as_str().to_owned(),
        deployment_url: history.deployment_url().map(str::to_owned),
        preview_url: history.preview_url().map(str::to_owned),
        commit_sha: history.commit_sha().map(str::to_owned),
        commit_message: history.commit_message().map(str::to_owned),
        triggered_by: history.triggered_by().as_str().to_owned(),
        error_message: history.error_message().map(str::to_owned),
        started_at: history.started_at(),
        completed_at: history.completed_at(),
    }
}

fn row_to_history(row: HistoryRow) -> DeploymentHistoryResult<DeploymentHistory> {
    let status = DeploymentStatus::try_from(row.status.as_str())
        .map_err(DeploymentHistoryError::persistence)?;
    let triggered_by = TriggerSource::try_from(row.triggered_by.as_str())
        .map_err(DeploymentHistoryError::persistence)?;

    Ok(DeploymentHistory::from_persisted(PersistedHistoryData {
        id: DeploymentId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        external_deployment_id: row.external_deployment_id,
        status,
        deployment_url: row.deployment_url,
        preview_url: row.preview_url,
        commit_sha: row.commit_sha,
        commit_message: row.commit_message,
        triggered_by,
        error_message: row.error_message,
        started_at: row.started_at,
        completed_at: row.completed_at,
    }))
}
