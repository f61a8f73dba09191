//! Diesel schema for deployment history persistence.

diesel::table! {
    /// One row per deployment attempt, updated in place as status arrives.
    deployment_history (id) {
        /// Internal record identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Platform-assigned deployment identifier.
        #[max_length = 255]
        external_deployment_id -> Varchar,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Deployment URL, when known.
        #[max_length = 1024]
        deployment_url -> Nullable<Varchar>,
        /// Preview URL, when known.
        #[max_length = 1024]
        preview_url -> Nullable<Varchar>,
        /// Commit SHA, when known.
        #[max_length = 64]
        commit_sha -> Nullable<Varchar>,
        /// Commit message, when known.
        commit_message -> Nullable<Text>,
        /// What initiated the record.
        #[max_length = 20]
        triggered_by -> Varchar,
        /// Platform-supplied failure message, when any.
        error_message -> Nullable<Text>,
        /// Start timestamp.
        started_at -> Timestamptz,
        /// Completion timestamp, when finished.
        completed_at -> Nullable<Timestamptz>,
    }
}
