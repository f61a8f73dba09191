//! Diesel schema for OAuth state persistence.

diesel::table! {
    /// Pending authorization-flow state tokens.
    oauth_states (id) {
        /// Internal record identifier.
        id -> Uuid,
        /// Requesting user.
        user_id -> Uuid,
        /// Target platform identifier.
        #[max_length = 50]
        platform -> Varchar,
        /// Opaque single-use token.
        #[max_length = 128]
        state_token -> Varchar,
        /// Expiry timestamp.
        expires_at -> Timestamptz,
    }
}
