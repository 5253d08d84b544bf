//! Database Connection Pool Module
//!
//! PostgreSQL connection pooling using deadpool-postgres and the
//! Postgres-backed [`RecipeCatalogue`].
//!
//! Tables:
//! - `ranking_id(date_kst TEXT, source TEXT, recipe_ids TEXT[], created_at_kst TIMESTAMPTZ)`
//! - `recipes(recipe_id TEXT PRIMARY KEY, doc JSONB)`

use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use deadpool_postgres::{
    Config, ManagerConfig, Pool, PoolConfig, PoolError, RecyclingMethod, Runtime,
};
use dishrank_core::{
    CatalogueError, DayKey, DishrankError, DishrankResult, RankingIdList, RecipeDetail,
    RecipePreview, Timestamp,
};
use dishrank_storage::RecipeCatalogue;
use serde_json::Value as JsonValue;
use tokio_postgres::NoTls;

use crate::constants::{DEFAULT_DB_POOL_SIZE, DEFAULT_QUERY_TIMEOUT_MS};
use crate::error::{ApiError, ApiResult};
use crate::telemetry::metrics;

/// Idempotent schema bootstrap for development databases.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS ranking_id (
    date_kst TEXT NOT NULL,
    source TEXT NOT NULL,
    recipe_ids TEXT[] NOT NULL,
    created_at_kst TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX IF NOT EXISTS ranking_id_lookup
    ON ranking_id (date_kst, source, created_at_kst DESC);
CREATE TABLE IF NOT EXISTS recipes (
    recipe_id TEXT PRIMARY KEY,
    doc JSONB NOT NULL
);
"#;

const PREVIEW_PROJECTION: &str = "jsonb_build_object(\
    'recipe_id', recipe_id, \
    'title', doc->'title', \
    'author', doc->'author', \
    'image', doc->'image')";

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// How long to wait for a pooled connection
    pub timeout: Duration,
    /// Deadline for a single catalogue operation
    pub query_timeout: Duration,
    /// Run [`SCHEMA_SQL`] at startup
    pub bootstrap_schema: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "dishrank".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: DEFAULT_DB_POOL_SIZE,
            timeout: Duration::from_secs(30),
            query_timeout: Duration::from_millis(DEFAULT_QUERY_TIMEOUT_MS),
            bootstrap_schema: false,
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("DISHRANK_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("DISHRANK_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("DISHRANK_DB_NAME").unwrap_or_else(|_| "dishrank".to_string()),
            user: std::env::var("DISHRANK_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("DISHRANK_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("DISHRANK_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_DB_POOL_SIZE),
            timeout: Duration::from_secs(
                std::env::var("DISHRANK_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            query_timeout: Duration::from_millis(
                std::env::var("DISHRANK_DB_QUERY_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_QUERY_TIMEOUT_MS),
            ),
            bootstrap_schema: std::env::var("DISHRANK_DB_BOOTSTRAP")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(false),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_cfg = PoolConfig::new(self.max_size);
        pool_cfg.timeouts.wait = Some(self.timeout);
        cfg.pool = Some(pool_cfg);

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// POSTGRES CATALOGUE
// ============================================================================

/// Recipe catalogue backed by PostgreSQL.
#[derive(Clone)]
pub struct PgCatalogue {
    pool: Pool,
    query_timeout: Duration,
}

impl PgCatalogue {
    pub fn new(pool: Pool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Create a catalogue from configuration.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool, config.query_timeout))
    }

    /// Create the tables if they do not exist.
    pub async fn ensure_schema(&self) -> DishrankResult<()> {
        self.timed("ensure_schema", async {
            let conn = self.get_conn("ensure_schema").await?;
            conn.batch_execute(SCHEMA_SQL)
                .await
                .map_err(|e| unavailable("ensure_schema", e))
        })
        .await
    }

    async fn get_conn(&self, operation: &str) -> DishrankResult<deadpool_postgres::Object> {
        let start = Instant::now();
        self.pool.get().await.map_err(|e| match e {
            PoolError::Timeout(_) => CatalogueError::Timeout {
                operation: format!("{operation} (pool wait)"),
                elapsed_ms: start.elapsed().as_millis() as u64,
            }
            .into(),
            other => unavailable(operation, other),
        })
    }

    /// Run `fut` under the per-query deadline and record its outcome.
    async fn timed<T, F>(&self, operation: &'static str, fut: F) -> DishrankResult<T>
    where
        F: Future<Output = DishrankResult<T>>,
    {
        let start = Instant::now();
        let result = match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(CatalogueError::Timeout {
                operation: operation.to_string(),
                elapsed_ms: start.elapsed().as_millis() as u64,
            }
            .into()),
        };

        let status = match &result {
            Ok(_) => "success",
            Err(DishrankError::Catalogue(CatalogueError::Timeout { .. })) => "timeout",
            Err(_) => "error",
        };
        if let Some(metrics) = metrics() {
            metrics.record_catalogue_operation(operation, status, start.elapsed().as_secs_f64());
        }
        result
    }
}

fn unavailable(operation: &str, err: impl std::fmt::Display) -> DishrankError {
    CatalogueError::Unavailable {
        operation: operation.to_string(),
        reason: err.to_string(),
    }
    .into()
}

fn malformed(document_id: &str, err: impl std::fmt::Display) -> DishrankError {
    CatalogueError::MalformedDocument {
        document_id: document_id.to_string(),
        reason: err.to_string(),
    }
    .into()
}

/// Escape LIKE metacharacters so the keyword matches literally.
fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn previews_from_rows(rows: &[tokio_postgres::Row]) -> DishrankResult<Vec<RecipePreview>> {
    rows.iter()
        .map(|row| {
            let doc: JsonValue = row.get(0);
            let id = doc
                .get("recipe_id")
                .and_then(JsonValue::as_str)
                .unwrap_or("<unknown>")
                .to_string();
            serde_json::from_value(doc).map_err(|e| malformed(&id, e))
        })
        .collect()
}

#[async_trait]
impl RecipeCatalogue for PgCatalogue {
    async fn find_latest_ranking_id_list(
        &self,
        day_key: DayKey,
        source: &str,
    ) -> DishrankResult<Option<RankingIdList>> {
        const OP: &str = "find_latest_ranking_id_list";
        self.timed(OP, async {
            let conn = self.get_conn(OP).await?;
            let row = conn
                .query_opt(
                    "SELECT date_kst, source, recipe_ids, created_at_kst FROM ranking_id \
                     WHERE date_kst = $1 AND source = $2 \
                     ORDER BY created_at_kst DESC LIMIT 1",
                    &[&day_key.to_string(), &source],
                )
                .await
                .map_err(|e| unavailable(OP, e))?;

            let Some(row) = row else {
                return Ok(None);
            };
            let date_kst: String = row.get(0);
            let date_kst = DayKey::parse(&date_kst).map_err(|e| malformed(&date_kst, e))?;
            let created_at_kst: Timestamp = row.get(3);
            Ok(Some(RankingIdList {
                date_kst,
                source: row.get(1),
                recipe_ids: row.get(2),
                created_at_kst,
            }))
        })
        .await
    }

    async fn find_recipes_by_ids(
        &self,
        ids: &[String],
        cap: usize,
    ) -> DishrankResult<Vec<RecipePreview>> {
        const OP: &str = "find_recipes_by_ids";
        if ids.is_empty() || cap == 0 {
            return Ok(Vec::new());
        }
        self.timed(OP, async {
            let conn = self.get_conn(OP).await?;
            let sql = format!(
                "SELECT {PREVIEW_PROJECTION} FROM recipes \
                 WHERE recipe_id = ANY($1) ORDER BY recipe_id LIMIT $2"
            );
            let rows = conn
                .query(sql.as_str(), &[&ids, &(cap as i64)])
                .await
                .map_err(|e| unavailable(OP, e))?;
            previews_from_rows(&rows)
        })
        .await
    }

    async fn find_recipe_by_id(&self, recipe_id: &str) -> DishrankResult<Option<RecipeDetail>> {
        const OP: &str = "find_recipe_by_id";
        self.timed(OP, async {
            let conn = self.get_conn(OP).await?;
            let row = conn
                .query_opt(
                    "SELECT doc || jsonb_build_object('recipe_id', recipe_id) \
                     FROM recipes WHERE recipe_id = $1",
                    &[&recipe_id],
                )
                .await
                .map_err(|e| unavailable(OP, e))?;

            match row {
                Some(row) => {
                    let doc: JsonValue = row.get(0);
                    serde_json::from_value(doc)
                        .map(Some)
                        .map_err(|e| malformed(recipe_id, e))
                }
                None => Ok(None),
            }
        })
        .await
    }

    async fn search_recipes(
        &self,
        keyword: &str,
        limit: usize,
    ) -> DishrankResult<Vec<RecipePreview>> {
        const OP: &str = "search_recipes";
        self.timed(OP, async {
            let conn = self.get_conn(OP).await?;
            let pattern = like_pattern(keyword);
            let sql = format!(
                "SELECT {PREVIEW_PROJECTION} FROM recipes \
                 WHERE doc->>'title' ILIKE $1 \
                    OR EXISTS (SELECT 1 FROM jsonb_array_elements(doc->'ingredients') AS i \
                               WHERE i->>'name' ILIKE $1) \
                 ORDER BY recipe_id LIMIT $2"
            );
            let rows = conn
                .query(sql.as_str(), &[&pattern, &(limit as i64)])
                .await
                .map_err(|e| unavailable(OP, e))?;
            previews_from_rows(&rows)
        })
        .await
    }

    async fn ping(&self) -> DishrankResult<()> {
        const OP: &str = "ping";
        self.timed(OP, async {
            let conn = self.get_conn(OP).await?;
            conn.query_one("SELECT 1", &[])
                .await
                .map_err(|e| unavailable(OP, e))?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_config_default() {
        let config = DbConfig::default();
        assert_eq!(config.port, 5432);
        assert_eq!(config.dbname, "dishrank");
        assert_eq!(config.query_timeout, Duration::from_millis(3000));
        assert!(!config.bootstrap_schema);
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("tofu"), "%tofu%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[tokio::test]
    async fn test_pool_creation_is_lazy() {
        // deadpool connects on first use, so building the pool needs no server.
        let catalogue = PgCatalogue::from_config(&DbConfig::default());
        assert!(catalogue.is_ok());
    }
}
