//! Read model of a source repository, used for ownership checks.

use super::RepositoryId;
use crate::credential::domain::UserId;
use serde::{Deserialize, Serialize};

/// Projection of a blog source repository owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRepository {
    /// Repository identifier.
    pub id: RepositoryId,
    /// Owning user.
    pub user_id: UserId,
    /// Repository owner login on the source-control host.
    pub owner: String,
    /// Repository name on the source-control host.
    pub name: String,
}

impl SourceRepository {
    /// Creates a repository projection.
    #[must_use]
    pub fn new(
        id: RepositoryId,
        user_id: UserId,
        owner: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            user_id,
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Returns whether the repository belongs to `user_id`.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}
