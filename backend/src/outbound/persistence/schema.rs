//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes the schema, regenerate them with `diesel print-schema`
//! or update them by hand.

diesel::table! {
    /// Login accounts.
    users (id) {
        id -> Int4,
        username -> Varchar,
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// One of `Admin`, `IT`, `Manager`, `Employee`.
        role -> Varchar,
    }
}

diesel::table! {
    /// People assets and licences are assigned to.
    employees (id) {
        id -> Int4,
        name -> Varchar,
        department -> Nullable<Varchar>,
        contact -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Hardware assets.
    assets (id) {
        id -> Int4,
        asset_tag -> Varchar,
        asset_type -> Nullable<Varchar>,
        brand -> Nullable<Varchar>,
        model -> Nullable<Varchar>,
        serial_no -> Nullable<Varchar>,
        purchase_date -> Nullable<Date>,
        warranty_expiry -> Nullable<Date>,
        status -> Nullable<Varchar>,
        notes -> Nullable<Text>,
        assigned_to -> Nullable<Int4>,
    }
}

diesel::table! {
    /// Maintenance records with their approval state.
    maintenance (id) {
        id -> Int4,
        asset_id -> Nullable<Int4>,
        #[sql_name = "date"]
        service_date -> Nullable<Date>,
        description -> Nullable<Text>,
        cost_cents -> Int8,
        /// `Pending` or `Approved`.
        status -> Varchar,
        approved_by -> Nullable<Int4>,
        approved_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Software licences.
    software_licenses (id) {
        id -> Int4,
        software_name -> Varchar,
        license_key -> Nullable<Varchar>,
        expiry_date -> Nullable<Date>,
        assigned_to -> Nullable<Int4>,
    }
}

diesel::joinable!(assets -> employees (assigned_to));
diesel::joinable!(maintenance -> assets (asset_id));
diesel::joinable!(maintenance -> users (approved_by));
diesel::joinable!(software_licenses -> employees (assigned_to));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    employees,
    assets,
    maintenance,
    software_licenses,
);
