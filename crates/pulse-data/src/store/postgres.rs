//! PostgreSQL storage, one table per destination.

use async_trait::async_trait;
use pulse_core::error::StorageError;
use pulse_core::traits::Storage;
use pulse_core::types::{ProcessedObservation, ProcessedSeries};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow, PgSslMode};
use sqlx::{Postgres, QueryBuilder, Row};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::validate_destination;

/// Rows per INSERT statement (8 bind parameters each).
const INSERT_CHUNK: usize = 1_000;

/// Connection settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    pub host: Option<String>,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
    /// Require TLS
    pub require_ssl: bool,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub application_name: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: 6543,
            user: "postgres".to_string(),
            password: None,
            database: "postgres".to_string(),
            require_ssl: true,
            max_connections: 5,
            connect_timeout_secs: 10,
            application_name: "stockpulse".to_string(),
        }
    }
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .field("require_ssl", &self.require_ssl)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl PostgresConfig {
    /// Fill unset fields from `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_NAME` and `DB_PASS`.
    pub fn with_env_fallback(mut self) -> Self {
        let var = |k: &str| std::env::var(k).ok().filter(|v| !v.is_empty());

        if self.host.is_none() {
            self.host = var("DB_HOST");
        }
        if self.password.is_none() {
            self.password = var("DB_PASS");
        }
        let defaults = Self::default();
        if self.port == defaults.port {
            if let Some(port) = var("DB_PORT").and_then(|p| p.parse().ok()) {
                self.port = port;
            }
        }
        if self.user == defaults.user {
            if let Some(user) = var("DB_USER") {
                self.user = user;
            }
        }
        if self.database == defaults.database {
            if let Some(db) = var("DB_NAME") {
                self.database = db;
            }
        }
        self
    }

    /// Whether enough is set to attempt a connection.
    pub fn is_configured(&self) -> bool {
        self.host.is_some() && self.password.is_some()
    }

    /// Redacted connection string for logs.
    pub fn display_url(&self) -> String {
        format!(
            "postgresql://{}:***@{}:{}/{}",
            self.user,
            self.host.as_deref().unwrap_or("<unset>"),
            self.port,
            self.database
        )
    }

    fn connect_options(&self) -> Result<PgConnectOptions, StorageError> {
        let host = self
            .host
            .as_deref()
            .ok_or_else(|| StorageError::Connection("database host not configured".into()))?;

        let mut options = PgConnectOptions::new()
            .host(host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database)
            .application_name(&self.application_name)
            .ssl_mode(if self.require_ssl {
                PgSslMode::Require
            } else {
                PgSslMode::Prefer
            });
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        Ok(options)
    }
}

/// PostgreSQL storage adapter.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect a pool.
    pub async fn connect(config: &PostgresConfig) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        info!(url = %config.display_url(), "Connected to PostgreSQL");
        Ok(Self { pool })
    }
}

fn quoted(destination: &str) -> Result<String, StorageError> {
    validate_destination(destination)?;
    Ok(format!("\"{}\"", destination))
}

fn create_table_sql(table: &str) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            date DATE PRIMARY KEY,
            open NUMERIC(14, 2) NOT NULL,
            high NUMERIC(14, 2) NOT NULL,
            low NUMERIC(14, 2) NOT NULL,
            close NUMERIC(14, 2) NOT NULL,
            volume BIGINT NOT NULL,
            daily_return NUMERIC(12, 6),
            sma_20 NUMERIC(14, 2),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#
    )
}

fn map_sqlx_error(e: sqlx::Error, destination: &str) -> StorageError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("42P01") => {
            StorageError::NotFound(destination.to_string())
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Connection(e.to_string()),
        _ => StorageError::Database(e.to_string()),
    }
}

/// Round a value to a fixed number of decimal places for a NUMERIC column.
fn to_decimal(value: f64, dp: u32) -> Result<Decimal, StorageError> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(dp))
        .ok_or_else(|| StorageError::Serialization(format!("{} is not representable", value)))
}

fn from_decimal(value: Decimal) -> Result<f64, StorageError> {
    value
        .to_f64()
        .ok_or_else(|| StorageError::Serialization(format!("{} is not representable", value)))
}

/// Column values for one row, in table order.
struct DbRow {
    date: chrono::NaiveDate,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    volume: i64,
    daily_return: Option<Decimal>,
    sma_20: Option<Decimal>,
}

impl DbRow {
    fn from_observation(obs: &ProcessedObservation) -> Result<Self, StorageError> {
        Ok(Self {
            date: obs.date,
            open: to_decimal(obs.open, 2)?,
            high: to_decimal(obs.high, 2)?,
            low: to_decimal(obs.low, 2)?,
            close: to_decimal(obs.close, 2)?,
            volume: obs.volume.round() as i64,
            daily_return: obs.daily_return.map(|r| to_decimal(r, 6)).transpose()?,
            sma_20: obs.sma_20.map(|s| to_decimal(s, 2)).transpose()?,
        })
    }
}

fn observation_from_row(row: &PgRow) -> Result<ProcessedObservation, sqlx::Error> {
    let decimal = |col: &str| -> Result<f64, sqlx::Error> {
        from_decimal(row.try_get::<Decimal, _>(col)?)
            .map_err(|e| sqlx::Error::Decode(e.to_string().into()))
    };
    let optional = |col: &str| -> Result<Option<f64>, sqlx::Error> {
        row.try_get::<Option<Decimal>, _>(col)?
            .map(from_decimal)
            .transpose()
            .map_err(|e| sqlx::Error::Decode(e.to_string().into()))
    };

    Ok(ProcessedObservation {
        date: row.try_get("date")?,
        open: decimal("open")?,
        high: decimal("high")?,
        low: decimal("low")?,
        close: decimal("close")?,
        volume: row.try_get::<i64, _>("volume")? as f64,
        daily_return: optional("daily_return")?,
        sma_20: optional("sma_20")?,
    })
}

#[async_trait]
impl Storage for PostgresStore {
    /// Create the table if needed, then replace its rows inside one transaction.
    #[instrument(skip(self, series), fields(rows = series.len()))]
    async fn upsert(
        &self,
        destination: &str,
        series: &ProcessedSeries,
    ) -> Result<usize, StorageError> {
        let table = quoted(destination)?;
        let rows = series
            .iter()
            .map(DbRow::from_observation)
            .collect::<Result<Vec<_>, _>>()?;
        let err = |e| map_sqlx_error(e, destination);

        let mut tx = self.pool.begin().await.map_err(err)?;

        sqlx::query(&create_table_sql(&table))
            .execute(&mut *tx)
            .await
            .map_err(err)?;
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await
            .map_err(err)?;

        for chunk in rows.chunks(INSERT_CHUNK) {
            let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
                "INSERT INTO {} (date, open, high, low, close, volume, daily_return, sma_20) ",
                table
            ));
            qb.push_values(chunk, |mut b, row| {
                b.push_bind(row.date)
                    .push_bind(row.open)
                    .push_bind(row.high)
                    .push_bind(row.low)
                    .push_bind(row.close)
                    .push_bind(row.volume)
                    .push_bind(row.daily_return)
                    .push_bind(row.sma_20);
            });
            qb.build().execute(&mut *tx).await.map_err(err)?;
        }

        tx.commit().await.map_err(err)?;

        debug!(destination, rows = rows.len(), "Replaced table contents");
        Ok(rows.len())
    }

    async fn read(&self, destination: &str) -> Result<ProcessedSeries, StorageError> {
        let table = quoted(destination)?;

        let rows = sqlx::query(&format!(
            "SELECT date, open, high, low, close, volume, daily_return, sma_20 \
             FROM {} ORDER BY date",
            table
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, destination))?;

        rows.iter()
            .map(observation_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map(ProcessedSeries::new)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn destinations(&self) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT table_name::text AS name
            FROM information_schema.tables
            WHERE table_schema = current_schema() AND table_name LIKE 'stock\_%'
            ORDER BY table_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "information_schema.tables"))?;

        Ok(rows.iter().map(|r| r.get::<String, _>("name")).collect())
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    fn name(&self) -> &str {
        "postgres"
    }
}
