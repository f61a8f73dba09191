//! `PostgreSQL` repository implementation for project persistence.

use super::{
    models::{NewProjectRow, ProjectRow, RepositoryRow},
    schema::{deployment_projects, repositories},
};
use crate::credential::domain::UserId;
use crate::hosting::domain::Platform;
use crate::project::domain::{
    DeploymentProject, PersistedProjectData, ProjectId, RepositoryId, SourceRepository,
};
use crate::project::ports::{
    ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult, RepositoryDirectory,
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by project adapters.
pub type ProjectPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: ProjectPgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ProjectPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProjectRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProjectRepositoryError::persistence)?
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn upsert(&self, project: &DeploymentProject) -> ProjectRepositoryResult<()> {
        let new_row = to_new_row(project);
        self.run_blocking(move |connection| {
            // The unique index on (repository_id, platform) backs the
            // one-project-per-pair invariant; conflicting setup calls update
            // the existing row in place.
            diesel::insert_into(deployment_projects::table)
                .values(&new_row)
                .on_conflict((
                    deployment_projects::repository_id,
                    deployment_projects::platform,
                ))
                .do_update()
                .set((
                    deployment_projects::external_project_id
                        .eq(new_row.external_project_id.clone()),
                    deployment_projects::project_name.eq(new_row.project_name.clone()),
                    deployment_projects::production_url.eq(new_row.production_url.clone()),
                    deployment_projects::custom_domains.eq(new_row.custom_domains.clone()),
                    deployment_projects::is_active.eq(new_row.is_active),
                    deployment_projects::updated_at.eq(new_row.updated_at),
                ))
                .execute(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn update(&self, project: &DeploymentProject) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let new_row = to_new_row(project);
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                deployment_projects::table
                    .filter(deployment_projects::id.eq(project_id.into_inner())),
            )
            .set((
                deployment_projects::external_project_id.eq(new_row.external_project_id.clone()),
                deployment_projects::project_name.eq(new_row.project_name.clone()),
                deployment_projects::production_url.eq(new_row.production_url.clone()),
                deployment_projects::custom_domains.eq(new_row.custom_domains.clone()),
                deployment_projects::is_active.eq(new_row.is_active),
                deployment_projects::updated_at.eq(new_row.updated_at),
            ))
            .execute(connection)
            .map_err(ProjectRepositoryError::persistence)?;

            if updated == 0 {
                return Err(ProjectRepositoryError::NotFound(project_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: ProjectId,
    ) -> ProjectRepositoryResult<Option<DeploymentProject>> {
        self.run_blocking(move |connection| {
            let row = deployment_projects::table
                .filter(deployment_projects::id.eq(id.into_inner()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn find_by_repository(
        &self,
        repository_id: RepositoryId,
        platform: Platform,
    ) -> ProjectRepositoryResult<Option<DeploymentProject>> {
        self.run_blocking(move |connection| {
            let row = deployment_projects::table
                .filter(deployment_projects::repository_id.eq(repository_id.into_inner()))
                .filter(deployment_projects::platform.eq(platform.as_str()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn find_by_external_id(
        &self,
        platform: Platform,
        external_project_id: &str,
    ) -> ProjectRepositoryResult<Option<DeploymentProject>> {
        let external = external_project_id.to_owned();
        self.run_blocking(move |connection| {
            let row = deployment_projects::table
                .filter(deployment_projects::platform.eq(platform.as_str()))
                .filter(deployment_projects::external_project_id.eq(external.clone()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn list_for_repositories(
        &self,
        repository_ids: &[RepositoryId],
    ) -> ProjectRepositoryResult<Vec<DeploymentProject>> {
        let ids: Vec<uuid::Uuid> = repository_ids
            .iter()
            .map(|id| id.into_inner())
            .collect();
        self.run_blocking(move |connection| {
            let rows = deployment_projects::table
                .filter(deployment_projects::repository_id.eq_any(ids.clone()))
                .order(deployment_projects::created_at.asc())
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            rows.into_iter().map(row_to_project).collect()
        })
        .await
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                deployment_projects::table
                    .filter(deployment_projects::id.eq(id.into_inner())),
            )
            .execute(connection)
            .map_err(ProjectRepositoryError::persistence)?;
            Ok(removed > 0)
        })
        .await
    }
}

/// `PostgreSQL`-backed repository directory.
#[derive(Debug, Clone)]
pub struct PostgresRepositoryDirectory {
    pool: ProjectPgPool,
}

impl PostgresRepositoryDirectory {
    /// Creates a new directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ProjectPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProjectRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProjectRepositoryError::persistence)?
    }
}

#[async_trait]
impl RepositoryDirectory for PostgresRepositoryDirectory {
    async fn find(
        &self,
        repository_id: RepositoryId,
    ) -> ProjectRepositoryResult<Option<SourceRepository>> {
        self.run_blocking(move |connection| {
            let row = repositories::table
                .filter(repositories::id.eq(repository_id.into_inner()))
                .select(RepositoryRow::as_select())
                .first::<RepositoryRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            Ok(row.map(row_to_repository))
        })
        .await
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> ProjectRepositoryResult<Vec<SourceRepository>> {
        self.run_blocking(move |connection| {
            let rows = repositories::table
                .filter(repositories::user_id.eq(user_id.into_inner()))
                .select(RepositoryRow::as_select())
                .load::<RepositoryRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_repository).collect())
        })
        .await
    }
}

fn to_new_row(project: &DeploymentProject) -> NewProjectRow {
    NewProjectRow {
        id: project.id().into_inner(),
        repository_id: project.repository_id().into_inner(),
        platform: project.platform().as_str().to_owned(),
        external_project_id: project.external_project_id().to_owned(),
        project_name: project.project_name().to_owned(),
        production_url: project.production_url().map(str::to_owned),
        custom_domains: serde_json::json!(project.custom_domains()),
        is_active: project.is_active(),
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    }
}

fn row_to_project(row: ProjectRow) -> ProjectRepositoryResult<DeploymentProject> {
    let platform =
        Platform::try_from(row.platform.as_str()).map_err(ProjectRepositoryError::persistence)?;
    let custom_domains = serde_json::from_value(row.custom_domains)
        .map_err(ProjectRepositoryError::persistence)?;

    Ok(DeploymentProject::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(row.id),
        repository_id: RepositoryId::from_uuid(row.repository_id),
        platform,
        external_project_id: row.external_project_id,
        project_name: row.project_name,
        production_url: row.production_url,
        custom_domains,
        is_active: row.is_active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn row_to_repository(row: RepositoryRow) -> SourceRepository {
    SourceRepository::new(
        RepositoryId::from_uuid(row.id),
        UserId::from_uuid(row.user_id),
        row.owner,
        row.name,
    )
}
