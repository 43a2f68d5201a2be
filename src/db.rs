use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::{Config, Object, Pool, Runtime};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio_postgres::Row;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::progress::{AnswerTotals, ListStats};
use crate::models::{Level, ListWord, PracticeSession, User, VocabularyList};
use crate::store::{ListOverview, Store};

const USER_COLUMNS: &str = "id, username, email, password_hash, level, created_at, last_login";

/// Schema, applied in order on every start. Every statement is idempotent.
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "users table",
        r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                username VARCHAR(50) UNIQUE NOT NULL,
                email VARCHAR(255) UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                level VARCHAR(2) NOT NULL DEFAULT 'A1',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                last_login TIMESTAMPTZ
            )
        "#,
    ),
    (
        "users level index",
        "CREATE INDEX IF NOT EXISTS idx_users_level ON users(level)",
    ),
    (
        "vocabulary_lists table",
        r#"
            CREATE TABLE IF NOT EXISTS vocabulary_lists (
                id UUID PRIMARY KEY,
                owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title VARCHAR(200) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
    ),
    (
        "vocabulary_lists owner index",
        "CREATE INDEX IF NOT EXISTS idx_vocabulary_lists_owner ON vocabulary_lists(owner_id, created_at DESC)",
    ),
    (
        "vocabulary_words table",
        r#"
            CREATE TABLE IF NOT EXISTS vocabulary_words (
                list_id UUID NOT NULL REFERENCES vocabulary_lists(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                word VARCHAR(200) NOT NULL,
                translation VARCHAR(200) NOT NULL,
                image_url TEXT,
                PRIMARY KEY (list_id, position)
            )
        "#,
    ),
    (
        "practice_sessions table",
        r#"
            CREATE TABLE IF NOT EXISTS practice_sessions (
                id UUID PRIMARY KEY,
                list_id UUID NOT NULL REFERENCES vocabulary_lists(id) ON DELETE CASCADE,
                user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                correct INTEGER NOT NULL CHECK (correct >= 0),
                incorrect INTEGER NOT NULL CHECK (incorrect >= 0),
                completed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
    ),
    (
        "practice_sessions user index",
        "CREATE INDEX IF NOT EXISTS idx_practice_sessions_user ON practice_sessions(user_id)",
    ),
    (
        "practice_sessions list index",
        "CREATE INDEX IF NOT EXISTS idx_practice_sessions_list ON practice_sessions(list_id)",
    ),
];

/// PostgreSQL backend holding a deadpool connection pool.
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Builds the pool and checks that a connection can be made.
    pub async fn new(config: DatabaseConfig) -> Result<Self, ApiError> {
        info!("Creating PostgreSQL connection pool for host: {}:{}", config.host, config.port);

        let pool = Self::create_pool(config)?;

        let db = Database { pool };
        db.test_connection().await?;

        Ok(db)
    }

    fn create_pool(config: DatabaseConfig) -> Result<Pool, ApiError> {
        let mut pg_config = Config::new();

        pg_config.host = Some(config.host);
        pg_config.port = Some(config.port);
        pg_config.dbname = Some(config.database);
        pg_config.user = Some(config.username);
        pg_config.password = Some(config.password);
        pg_config.connect_timeout = Some(config.connection_timeout);

        match config.ssl_mode.as_str() {
            "disable" => {
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Disable);
            }
            "prefer" => {
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Prefer);
            }
            "require" => {
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Require);
            }
            _ => {
                warn!("Unknown SSL mode '{}', defaulting to 'require'", config.ssl_mode);
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Require);
            }
        }

        pg_config.manager = Some(deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        });

        let mut pool_config = deadpool_postgres::PoolConfig::new(config.max_connections as usize);
        pool_config.timeouts.wait = Some(config.connection_timeout);
        pg_config.pool = Some(pool_config);

        let tls_connector = TlsConnector::builder()
            .build()
            .map_err(|e| {
                error!("Failed to create TLS connector: {}", e);
                ApiError::Database(format!("TLS connector creation failed: {}", e))
            })?;
        let tls = MakeTlsConnector::new(tls_connector);

        pg_config.create_pool(Some(Runtime::Tokio1), tls)
            .map_err(|e| {
                error!("Failed to create connection pool: {}", e);
                ApiError::Database(format!("Connection pool creation failed: {}", e))
            })
    }

    async fn get_connection(&self) -> Result<Object, ApiError> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// Creates tables and indexes that do not exist yet.
    pub async fn migrate(&self) -> Result<(), ApiError> {
        info!("Running database migrations");

        let client = self.get_connection().await?;

        for (name, statement) in MIGRATIONS {
            client.execute(*statement, &[])
                .await
                .map_err(|e| {
                    error!("Migration step '{}' failed: {}", name, e);
                    ApiError::Database(format!("Migration '{}' failed: {}", name, e))
                })?;
        }

        info!("Database migrations completed successfully ({} steps)", MIGRATIONS.len());
        Ok(())
    }

    pub async fn test_connection(&self) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[])
            .await
            .map_err(|e| {
                error!("Database connection test failed: {}", e);
                ApiError::Database(format!("Connection test failed: {}", e))
            })?;

        info!("Database connection test successful");
        Ok(())
    }
}

fn user_from_row(row: &Row) -> Result<User, ApiError> {
    let level: String = row.get(4);
    let level = level.parse::<Level>().map_err(|e| {
        error!("Corrupt level stored for user: {}", e);
        ApiError::Database(format!("Invalid stored level: {}", e))
    })?;

    Ok(User {
        id: row.get(0),
        username: row.get(1),
        email: row.get(2),
        password_hash: row.get(3),
        level,
        created_at: row.get(5),
        last_login: row.get(6),
    })
}

fn non_negative(value: i64) -> u64 {
    value.max(0) as u64
}

#[async_trait]
impl Store for Database {
    async fn health_check(&self) -> ApiResult<()> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[])
            .await
            .map_err(|e| {
                error!("Database health check failed: {}", e);
                ApiError::Database(format!("Health check failed: {}", e))
            })?;

        Ok(())
    }

    async fn create_user(&self, user: User) -> ApiResult<User> {
        let client = self.get_connection().await?;

        let query = format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {USER_COLUMNS}"
        );

        let row = client.query_one(
            &query,
            &[
                &user.id,
                &user.username,
                &user.email,
                &user.password_hash,
                &user.level.as_str(),
                &user.created_at,
                &user.last_login,
            ],
        )
        .await
        .map_err(ApiError::from)?;

        let created = user_from_row(&row)?;
        info!("Created user with id: {}", created.id);
        Ok(created)
    }

    async fn user_exists(&self, email: &str, username: &str) -> ApiResult<bool> {
        let client = self.get_connection().await?;

        let row = client.query_one(
            "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1 OR username = $2)",
            &[&email, &username],
        )
        .await
        .map_err(ApiError::from)?;

        Ok(row.get(0))
    }

    async fn find_user_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let client = self.get_connection().await?;
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        let row = client.query_opt(&query, &[&email])
            .await
            .map_err(ApiError::from)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_id(&self, id: Uuid) -> ApiResult<Option<User>> {
        let client = self.get_connection().await?;
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let row = client.query_opt(&query, &[&id])
            .await
            .map_err(ApiError::from)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> ApiResult<()> {
        let client = self.get_connection().await?;

        client.execute("UPDATE users SET last_login = $1 WHERE id = $2", &[&at, &id])
            .await
            .map_err(ApiError::from)?;

        Ok(())
    }

    async fn update_level(&self, id: Uuid, level: Level) -> ApiResult<Option<User>> {
        let client = self.get_connection().await?;
        let query = format!("UPDATE users SET level = $1 WHERE id = $2 RETURNING {USER_COLUMNS}");

        let row = client.query_opt(&query, &[&level.as_str(), &id])
            .await
            .map_err(ApiError::from)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn create_list(&self, list: VocabularyList) -> ApiResult<VocabularyList> {
        let mut client = self.get_connection().await?;
        let transaction = client.transaction().await.map_err(ApiError::from)?;

        transaction.execute(
            r#"
                INSERT INTO vocabulary_lists (id, owner_id, title, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5)
            "#,
            &[&list.id, &list.owner_id, &list.title, &list.created_at, &list.updated_at],
        )
        .await
        .map_err(ApiError::from)?;

        let insert_word = transaction.prepare(
            r#"
                INSERT INTO vocabulary_words (list_id, position, word, translation, image_url)
                VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .await
        .map_err(ApiError::from)?;

        for (position, entry) in list.words.iter().enumerate() {
            let position = position as i32;
            transaction.execute(
                &insert_word,
                &[&list.id, &position, &entry.word, &entry.translation, &entry.image_url],
            )
            .await
            .map_err(ApiError::from)?;
        }

        transaction.commit().await.map_err(ApiError::from)?;

        info!("Created vocabulary list {} with {} words", list.id, list.words.len());
        Ok(list)
    }

    async fn list_overviews(&self, owner_id: Uuid) -> ApiResult<Vec<ListOverview>> {
        let client = self.get_connection().await?;
        let query = r#"
            SELECT l.id, l.title, l.created_at,
                   (SELECT COUNT(*) FROM vocabulary_words w WHERE w.list_id = l.id) AS total_words,
                   COALESCE((SELECT MAX(p.correct) FROM practice_sessions p WHERE p.list_id = l.id), 0) AS best_correct
            FROM vocabulary_lists l
            WHERE l.owner_id = $1
            ORDER BY l.created_at DESC
        "#;

        let rows = client.query(query, &[&owner_id])
            .await
            .map_err(ApiError::from)?;

        let overviews = rows.iter().map(|row| {
            let total_words: i64 = row.get(3);
            let best_correct: i32 = row.get(4);

            ListOverview {
                id: row.get(0),
                title: row.get(1),
                created_at: row.get(2),
                stats: ListStats {
                    total_words: non_negative(total_words) as u32,
                    best_correct: best_correct.max(0) as u32,
                },
            }
        }).collect();

        Ok(overviews)
    }

    async fn get_list(&self, owner_id: Uuid, list_id: Uuid) -> ApiResult<Option<VocabularyList>> {
        let client = self.get_connection().await?;

        let row = client.query_opt(
            "SELECT id, owner_id, title, created_at, updated_at FROM vocabulary_lists WHERE id = $1 AND owner_id = $2",
            &[&list_id, &owner_id],
        )
        .await
        .map_err(ApiError::from)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let word_rows = client.query(
            "SELECT word, translation, image_url FROM vocabulary_words WHERE list_id = $1 ORDER BY position",
            &[&list_id],
        )
        .await
        .map_err(ApiError::from)?;

        let words = word_rows.iter().map(|w| ListWord {
            word: w.get(0),
            translation: w.get(1),
            image_url: w.get(2),
        }).collect();

        Ok(Some(VocabularyList {
            id: row.get(0),
            owner_id: row.get(1),
            title: row.get(2),
            words,
            created_at: row.get(3),
            updated_at: row.get(4),
        }))
    }

    async fn delete_list(&self, owner_id: Uuid, list_id: Uuid) -> ApiResult<bool> {
        let client = self.get_connection().await?;

        let rows_affected = client.execute(
            "DELETE FROM vocabulary_lists WHERE id = $1 AND owner_id = $2",
            &[&list_id, &owner_id],
        )
        .await
        .map_err(ApiError::from)?;

        if rows_affected > 0 {
            info!("Deleted vocabulary list {} (cascade deleted words and sessions)", list_id);
        }

        Ok(rows_affected > 0)
    }

    async fn record_practice(&self, session: PracticeSession) -> ApiResult<PracticeSession> {
        let client = self.get_connection().await?;

        let correct = i32::try_from(session.correct)
            .map_err(|_| ApiError::validation("Numeric value is out of range"))?;
        let incorrect = i32::try_from(session.incorrect)
            .map_err(|_| ApiError::validation("Numeric value is out of range"))?;

        client.execute(
            r#"
                INSERT INTO practice_sessions (id, list_id, user_id, correct, incorrect, completed_at)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
            &[&session.id, &session.list_id, &session.user_id, &correct, &incorrect, &session.completed_at],
        )
        .await
        .map_err(ApiError::from)?;

        Ok(session)
    }

    async fn answer_totals(&self, user_id: Uuid) -> ApiResult<AnswerTotals> {
        let client = self.get_connection().await?;

        let row = client.query_one(
            r#"
                SELECT COALESCE(SUM(correct), 0)::BIGINT,
                       COALESCE(SUM(correct + incorrect), 0)::BIGINT
                FROM practice_sessions
                WHERE user_id = $1
            "#,
            &[&user_id],
        )
        .await
        .map_err(ApiError::from)?;

        Ok(AnswerTotals {
            correct: non_negative(row.get(0)),
            answered: non_negative(row.get(1)),
        })
    }

    async fn learners(&self, level: Option<Level>) -> ApiResult<Vec<(User, AnswerTotals)>> {
        let client = self.get_connection().await?;
        let level_filter: Option<&str> = level.as_ref().map(Level::as_str);

        let rows = client.query(
            r#"
                SELECT u.id, u.username, u.email, u.password_hash, u.level, u.created_at, u.last_login,
                       COALESCE(SUM(p.correct), 0)::BIGINT,
                       COALESCE(SUM(p.correct + p.incorrect), 0)::BIGINT
                FROM users u
                LEFT JOIN practice_sessions p ON p.user_id = u.id
                WHERE $1::TEXT IS NULL OR u.level = $1::TEXT
                GROUP BY u.id
            "#,
            &[&level_filter],
        )
        .await
        .map_err(ApiError::from)?;

        rows.iter()
            .map(|row| {
                let user = user_from_row(row)?;
                let totals = AnswerTotals {
                    correct: non_negative(row.get(7)),
                    answered: non_negative(row.get(8)),
                };
                Ok((user, totals))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent_statements() {
        for (name, statement) in MIGRATIONS {
            assert!(statement.contains("IF NOT EXISTS"), "migration '{}' is not idempotent", name);
        }
    }

    #[test]
    fn test_non_negative_clamps() {
        assert_eq!(non_negative(-3), 0);
        assert_eq!(non_negative(42), 42);
    }
}
