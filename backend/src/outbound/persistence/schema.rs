//! Diesel table definitions.
//!
//! Must match `backend/migrations`; regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Local user rows, one per identity provider subject.
    users (id) {
        id -> Uuid,
        /// Provider `sub` claim; unique.
        cognito_sub -> Varchar,
        email -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// User-defined trackers; `(user_id, name)` is unique.
    trackers (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    symptoms (id) {
        id -> Uuid,
        tracker_id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    symptom_logs (id) {
        id -> Uuid,
        user_id -> Uuid,
        tracker_id -> Uuid,
        log_time -> Timestamptz,
        severity -> Varchar,
        symptoms -> Text,
        notes -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(trackers -> users (user_id));
diesel::joinable!(symptoms -> trackers (tracker_id));
diesel::joinable!(symptom_logs -> trackers (tracker_id));
diesel::joinable!(symptom_logs -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, trackers, symptoms, symptom_logs);
