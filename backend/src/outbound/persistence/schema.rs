//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them
//! for compile-time query validation and type-safe SQL generation.
//! Regenerate with `diesel print-schema` when migrations change.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name shown on rendered pages.
        name -> Varchar,
        /// Normalised email address; unique.
        email -> Varchar,
        /// Salted bcrypt password hash.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Job applications, each owned by exactly one user.
    jobs (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Company the application was sent to.
        company -> Varchar,
        /// Position applied for.
        position -> Varchar,
        /// Application status: pending, interview, or declined.
        status -> Varchar,
        /// Owning user; immutable after creation.
        created_by -> Uuid,
        /// Record creation timestamp; drives newest-first listings.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(jobs -> users (created_by));
diesel::allow_tables_to_appear_in_same_query!(jobs, users);
