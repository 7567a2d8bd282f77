//! Diesel schema, hand-maintained (no live database in this workspace to
//! run `diesel print-schema` against). Mirrors the physical DDL in
//! `migrations/2024-01-01-000000_create_pid_tables/up.sql` exactly.
//!
//! Column names are kept as `type`/`value`/`created` rather than renamed
//! to `kind`/`seed_value`/`created_at`, so the schema matches the tables
//! a deployed instance already has on disk.

diesel::table! {
    pid_seed (type_) {
        #[sql_name = "type"]
        type_ -> Varchar,
        value -> BigInt,
    }
}

diesel::table! {
    pid_minted (type_, identifier) {
        #[sql_name = "type"]
        type_ -> Varchar,
        identifier -> Varchar,
        created -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(pid_seed, pid_minted,);
diesel::joinable!(pid_minted -> pid_seed (type_));
