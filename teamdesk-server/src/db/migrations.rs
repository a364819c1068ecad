//! Schema creation for the CRM tables
//!
//! Every statement is `IF NOT EXISTS`, so running on each start is safe.
//! Closed vocabularies live in TEXT columns; the API validates them.

use sqlx::PgPool;

use super::repos::DbError;

const SCHEMA: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            avatar TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "leads",
        r#"
        CREATE TABLE IF NOT EXISTS leads (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            company TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT,
            status TEXT NOT NULL DEFAULT 'New',
            source TEXT NOT NULL,
            country TEXT NOT NULL,
            avatar TEXT,
            owner_name TEXT NOT NULL,
            owner_avatar TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "deals",
        r#"
        CREATE TABLE IF NOT EXISTS deals (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            value DOUBLE PRECISION NOT NULL DEFAULT 0,
            stage TEXT NOT NULL DEFAULT 'Qualification',
            lead_id TEXT,
            owner_name TEXT NOT NULL,
            owner_avatar TEXT NOT NULL,
            close_date DATE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "contacts",
        r#"
        CREATE TABLE IF NOT EXISTS contacts (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL DEFAULT '',
            company TEXT NOT NULL DEFAULT '',
            tags TEXT[] NOT NULL DEFAULT '{}',
            avatar TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "activities",
        r#"
        CREATE TABLE IF NOT EXISTS activities (
            id BIGSERIAL PRIMARY KEY,
            type TEXT NOT NULL,
            content TEXT NOT NULL,
            date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            lead_id BIGINT,
            author_name TEXT NOT NULL,
            author_avatar TEXT NOT NULL
        )
        "#,
    ),
    (
        "tasks",
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            priority TEXT NOT NULL DEFAULT 'Medium',
            status TEXT NOT NULL DEFAULT 'To Do',
            due_date DATE,
            assignee_name TEXT NOT NULL,
            assignee_avatar TEXT NOT NULL,
            related_type TEXT,
            related_id TEXT,
            related_name TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "products",
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            price DOUBLE PRECISION NOT NULL DEFAULT 0,
            category TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "bookmarks",
        r#"
        CREATE TABLE IF NOT EXISTS bookmarks (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            subtitle TEXT NOT NULL DEFAULT '',
            type TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_activities_date ON activities (date DESC)",
    "CREATE INDEX IF NOT EXISTS idx_activities_lead ON activities (lead_id)",
    "CREATE INDEX IF NOT EXISTS idx_deals_stage_close ON deals (stage, close_date)",
];

/// Table names in creation order
pub fn table_names() -> impl Iterator<Item = &'static str> {
    SCHEMA.iter().map(|(name, _)| *name)
}

/// Create all tables and indexes.
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running migrations...");

    for &(table, ddl) in SCHEMA {
        sqlx::query(ddl).execute(pool).await?;
        tracing::debug!(table, "table ready");
    }

    for &ddl in INDEXES {
        sqlx::query(ddl).execute(pool).await?;
    }

    tracing::info!(tables = SCHEMA.len(), "Migrations complete");
    Ok(())
}
