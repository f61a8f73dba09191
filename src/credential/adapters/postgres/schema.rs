//! Diesel schema for credential persistence.

diesel::table! {
    /// One platform connection per `(user, platform)` pair.
    platform_credentials (user_id, platform) {
        /// Owning user.
        user_id -> Uuid,
        /// Connected platform identifier.
        #[max_length = 50]
        platform -> Varchar,
        /// Access token in its stored (possibly sealed) form.
        access_token -> Text,
        /// Optional team identifier for team-scoped platforms.
        #[max_length = 255]
        team_id -> Nullable<Varchar>,
        /// Optional account identifier for account-scoped platforms.
        #[max_length = 255]
        account_id -> Nullable<Varchar>,
        /// Connection timestamp.
        created_at -> Timestamptz,
        /// Last rotation timestamp.
        updated_at -> Timestamptz,
    }
}
