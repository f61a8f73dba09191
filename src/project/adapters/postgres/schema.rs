//! Diesel schema for project persistence.

diesel::table! {
    /// Deployment projects, unique per `(repository, platform)` pair.
    deployment_projects (id) {
        /// Internal project identifier.
        id -> Uuid,
        /// Backing source repository.
        repository_id -> Uuid,
        /// Hosting platform identifier.
        #[max_length = 50]
        platform -> Varchar,
        /// Platform-assigned project identifier.
        #[max_length = 255]
        external_project_id -> Varchar,
        /// Project name on the platform.
        #[max_length = 255]
        project_name -> Varchar,
        /// Production URL, when assigned.
        #[max_length = 1024]
        production_url -> Nullable<Varchar>,
        /// Ordered custom domain list.
        custom_domains -> Jsonb,
        /// Activation state.
        is_active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Read-only projection of the blog-content repository store.
    repositories (id) {
        /// Repository identifier.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Repository owner login.
        #[max_length = 255]
        owner -> Varchar,
        /// Repository name.
        #[max_length = 255]
        name -> Varchar,
    }
}
