//! Repository for per-viewer search history.
//!
//! Each viewer keeps at most [`HISTORY_LIMIT`] distinct query strings.
//! Repeating a query refreshes its timestamp instead of adding a row.

use cookiejar_core::search::HISTORY_LIMIT;
use cookiejar_core::types::DbId;
use sqlx::PgPool;

use crate::models::search::SearchHistoryEntry;

/// Provides search-history recording and management.
pub struct SearchHistoryRepo;

impl SearchHistoryRepo {
    /// Record `query` for `user_id` and evict entries beyond the newest ten.
    ///
    /// Blank queries are ignored.
    pub async fn record(pool: &PgPool, user_id: DbId, query: &str) -> Result<(), sqlx::Error> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }

        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO search_history (user_id, query) VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_search_history_user_query \
             DO UPDATE SET searched_at = clock_timestamp()",
        )
        .bind(user_id)
        .bind(query)
        .execute(&mut *tx)
        .await?;

        let evicted = sqlx::query(
            "DELETE FROM search_history \
             WHERE user_id = $1 AND id NOT IN ( \
                 SELECT id FROM search_history \
                 WHERE user_id = $1 \
                 ORDER BY searched_at DESC, id DESC \
                 LIMIT $2 \
             )",
        )
        .bind(user_id)
        .bind(HISTORY_LIMIT)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        if evicted > 0 {
            tracing::debug!(user_id, evicted, "Evicted old search history entries");
        }
        Ok(())
    }

    /// Most recent entries first, at most ten.
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<SearchHistoryEntry>, sqlx::Error> {
        sqlx::query_as::<_, SearchHistoryEntry>(
            "SELECT id, query, searched_at FROM search_history \
             WHERE user_id = $1 \
             ORDER BY searched_at DESC, id DESC \
             LIMIT $2",
        )
        .bind(user_id)
        .bind(HISTORY_LIMIT)
        .fetch_all(pool)
        .await
    }

    /// Delete every entry for `user_id`. Returns the number removed.
    pub async fn clear(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM search_history WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete one entry owned by `user_id`. Returns `true` if a row was deleted.
    pub async fn delete_item(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM search_history WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
