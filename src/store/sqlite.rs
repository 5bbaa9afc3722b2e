//! SQLite storage backend.
//!
//! The relational rendition of the persistence contract: a key/value config
//! table, a catalog table upserted by id, and a per-user inventory table.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use crate::errors::AppError;
use crate::models::{
    CatalogEntry, CollectionItem, Condition, FieldValue, NewInventoryItem, Provenance,
};

use super::StorageBackend;

/// SQLite-backed implementation of [`StorageBackend`].
#[derive(Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    /// Open (or create) the database and run embedded migrations.
    pub async fn connect(db_path: &Path) -> Result<Self, sqlx::Error> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await.ok();
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let options = SqliteConnectOptions::from_str(&db_url)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        run_migrations(&pool).await?;

        Ok(Self { pool })
    }
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS api_keys (
            name TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS catalog (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            weapon TEXT,
            category TEXT,
            pattern TEXT,
            min_float REAL,
            max_float REAL,
            rarity TEXT,
            image TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inventory (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            weapon TEXT NOT NULL,
            category TEXT NOT NULL,
            rarity TEXT NOT NULL,
            float_value REAL,
            exterior TEXT,
            stattrak INTEGER NOT NULL DEFAULT 0,
            souvenir INTEGER NOT NULL DEFAULT 0,
            image_url TEXT NOT NULL,
            provenance TEXT NOT NULL DEFAULT 'own-collection',
            created_at TEXT NOT NULL,
            purchase_price REAL,
            purchase_date TEXT,
            purchase_location TEXT,
            expected_sale_price REAL,
            trade_lock INTEGER,
            trade_lock_end_date TEXT,
            comments TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_inventory_user ON inventory(user_id);
        CREATE INDEX IF NOT EXISTS idx_inventory_created_at ON inventory(created_at);
        CREATE INDEX IF NOT EXISTS idx_catalog_name ON catalog(name);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[async_trait]
impl StorageBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn config_get(&self, key: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM api_keys WHERE name = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("value")))
    }

    async fn config_set(&self, key: &str, value: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO api_keys (name, value, created_at)
               VALUES (?, ?, datetime('now'))
               ON CONFLICT(name) DO UPDATE SET value = excluded.value"#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn catalog_load(&self) -> Result<Vec<CatalogEntry>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, description, weapon, category, pattern, min_float, max_float, rarity, image FROM catalog"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(catalog_entry_from_row).collect())
    }

    async fn catalog_save(&self, entries: &[CatalogEntry]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for entry in entries {
            sqlx::query(
                r#"INSERT INTO catalog (id, name, description, weapon, category, pattern, min_float, max_float, rarity, image)
                   VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                   ON CONFLICT(id) DO UPDATE SET
                       name = excluded.name,
                       description = excluded.description,
                       weapon = excluded.weapon,
                       category = excluded.category,
                       pattern = excluded.pattern,
                       min_float = excluded.min_float,
                       max_float = excluded.max_float,
                       rarity = excluded.rarity,
                       image = excluded.image"#,
            )
            .bind(&entry.id)
            .bind(&entry.name)
            .bind(&entry.description)
            .bind(entry.weapon.as_ref().map(FieldValue::to_column))
            .bind(entry.category.as_ref().map(FieldValue::to_column))
            .bind(entry.pattern.as_ref().map(FieldValue::to_column))
            .bind(entry.min_float)
            .bind(entry.max_float)
            .bind(entry.rarity.as_ref().map(FieldValue::to_column))
            .bind(&entry.image)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn inventory_list(&self, user_id: &str) -> Result<Vec<CollectionItem>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, user_id, name, weapon, category, rarity, float_value, exterior,
                      stattrak, souvenir, image_url, provenance, created_at,
                      purchase_price, purchase_date, purchase_location, expected_sale_price,
                      trade_lock, trade_lock_end_date, comments
               FROM inventory WHERE user_id = ? ORDER BY created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(item_from_row).collect())
    }

    async fn inventory_add(
        &self,
        user_id: &str,
        item: NewInventoryItem,
    ) -> Result<CollectionItem, AppError> {
        let record = item.into_item(user_id);

        sqlx::query(
            r#"INSERT INTO inventory (
                id, user_id, name, weapon, category, rarity, float_value, exterior,
                stattrak, souvenir, image_url, provenance, created_at,
                purchase_price, purchase_date, purchase_location, expected_sale_price,
                trade_lock, trade_lock_end_date, comments
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(&record.name)
        .bind(&record.weapon)
        .bind(&record.category)
        .bind(&record.rarity)
        .bind(record.float)
        .bind(record.condition.map(|c| c.as_str()))
        .bind(record.stattrak as i32)
        .bind(record.souvenir as i32)
        .bind(&record.image_url)
        .bind(record.provenance.as_str())
        .bind(&record.created_at)
        .bind(record.purchase_price)
        .bind(&record.purchase_date)
        .bind(&record.purchase_location)
        .bind(record.expected_sale_price)
        .bind(record.trade_lock.map(|b| b as i32))
        .bind(&record.trade_lock_end_date)
        .bind(&record.comments)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn inventory_delete(&self, user_id: &str, item_id: &str) -> Result<(), AppError> {
        // Idempotent: zero rows affected is fine
        sqlx::query("DELETE FROM inventory WHERE id = ? AND user_id = ?")
            .bind(item_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// Helper functions for row conversion

fn catalog_entry_from_row(row: &sqlx::sqlite::SqliteRow) -> CatalogEntry {
    let weapon: Option<String> = row.get("weapon");
    let category: Option<String> = row.get("category");
    let pattern: Option<String> = row.get("pattern");
    let rarity: Option<String> = row.get("rarity");

    CatalogEntry {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        weapon: weapon.as_deref().map(FieldValue::from_column),
        category: category.as_deref().map(FieldValue::from_column),
        pattern: pattern.as_deref().map(FieldValue::from_column),
        min_float: row.get("min_float"),
        max_float: row.get("max_float"),
        rarity: rarity.as_deref().map(FieldValue::from_column),
        image: row.get("image"),
    }
}

fn item_from_row(row: &sqlx::sqlite::SqliteRow) -> CollectionItem {
    let stattrak: i32 = row.get("stattrak");
    let souvenir: i32 = row.get("souvenir");
    let trade_lock: Option<i32> = row.get("trade_lock");
    let exterior: Option<String> = row.get("exterior");
    let provenance: String = row.get("provenance");

    CollectionItem {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        weapon: row.get("weapon"),
        category: row.get("category"),
        rarity: row.get("rarity"),
        float: row.get("float_value"),
        condition: exterior.as_deref().and_then(Condition::from_str),
        stattrak: stattrak != 0,
        souvenir: souvenir != 0,
        image_url: row.get("image_url"),
        provenance: Provenance::from_str(&provenance).unwrap_or(Provenance::OwnCollection),
        created_at: row.get("created_at"),
        purchase_price: row.get("purchase_price"),
        purchase_date: row.get("purchase_date"),
        purchase_location: row.get("purchase_location"),
        expected_sale_price: row.get("expected_sale_price"),
        trade_lock: trade_lock.map(|v| v != 0),
        trade_lock_end_date: row.get("trade_lock_end_date"),
        comments: row.get("comments"),
    }
}
