//! Repository for the `todos` table.

use sqlx::PgPool;
use todolist_core::criteria::PredicateSet;
use todolist_core::pagination::{Page, PageRequest};
use todolist_core::todo::TodoDraft;
use todolist_core::types::DbId;

use crate::models::todo::Todo;
use crate::query::{order_by, SqlFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, importance, urgency, deadline, done, created_at, updated_at";

/// Provides CRUD and filtered paging for to-do items.
pub struct TodoRepo;

impl TodoRepo {
    /// Insert a new item, returning the created row.
    pub async fn create(pool: &PgPool, input: &TodoDraft) -> Result<Todo, sqlx::Error> {
        let query = format!(
            "INSERT INTO todos (title, importance, urgency, deadline, done)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(&input.title)
            .bind(input.importance)
            .bind(input.urgency)
            .bind(input.deadline)
            .bind(&input.done)
            .fetch_one(pool)
            .await
    }

    /// Find an item by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Todo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM todos WHERE id = $1");
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite every editable column of an item.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &TodoDraft,
    ) -> Result<Option<Todo>, sqlx::Error> {
        let query = format!(
            "UPDATE todos SET
                title = $2,
                importance = $3,
                urgency = $4,
                deadline = $5,
                done = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.importance)
            .bind(input.urgency)
            .bind(input.deadline)
            .bind(&input.done)
            .fetch_optional(pool)
            .await
    }

    /// Delete an item by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// One page of the unfiltered list, ordered by the request's sort.
    pub async fn list_page(pool: &PgPool, page: &PageRequest) -> Result<Page<Todo>, sqlx::Error> {
        let filter = SqlFilter::from_predicates(&PredicateSet::new());
        fetch_page(pool, &filter, &order_by(page.sort), page).await
    }

    /// Every row matching `predicates`, id ascending, without paging.
    pub async fn find_all_matching(
        pool: &PgPool,
        predicates: &PredicateSet,
    ) -> Result<Vec<Todo>, sqlx::Error> {
        let filter = SqlFilter::from_predicates(predicates);
        let query = format!(
            "SELECT {COLUMNS} FROM todos {} ORDER BY {}",
            filter.where_clause(),
            order_by(predicates.order())
        );
        tracing::debug!(sql = %query, binds = filter.binds().len(), "Querying all matching todos");

        filter
            .bind_query_as(sqlx::query_as::<_, Todo>(&query))
            .fetch_all(pool)
            .await
    }

    /// Number of rows matching `predicates`.
    pub async fn count_matching(
        pool: &PgPool,
        predicates: &PredicateSet,
    ) -> Result<i64, sqlx::Error> {
        count(pool, &SqlFilter::from_predicates(predicates)).await
    }

    /// One page of the rows matching `predicates`, id ascending.
    ///
    /// The page's `total_elements` counts every match, independent of which
    /// page was requested.
    pub async fn find_page(
        pool: &PgPool,
        predicates: &PredicateSet,
        page: &PageRequest,
    ) -> Result<Page<Todo>, sqlx::Error> {
        let filter = SqlFilter::from_predicates(predicates);
        fetch_page(pool, &filter, &order_by(predicates.order()), page).await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

async fn count(pool: &PgPool, filter: &SqlFilter) -> Result<i64, sqlx::Error> {
    let query = format!(
        "SELECT COUNT(*)::BIGINT AS count FROM todos {}",
        filter.where_clause()
    );
    filter
        .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
        .fetch_one(pool)
        .await
}

/// Count the matches, then fetch the requested slice with the same binds.
async fn fetch_page(
    pool: &PgPool,
    filter: &SqlFilter,
    order_by: &str,
    page: &PageRequest,
) -> Result<Page<Todo>, sqlx::Error> {
    let total = count(pool, filter).await?;

    let bind_idx = filter.next_index();
    let query = format!(
        "SELECT {COLUMNS} FROM todos {} ORDER BY {order_by} LIMIT ${bind_idx} OFFSET ${}",
        filter.where_clause(),
        bind_idx + 1
    );
    tracing::debug!(
        sql = %query,
        page = page.page,
        size = page.size,
        total,
        "Fetching todo page"
    );

    let content = filter
        .bind_query_as(sqlx::query_as::<_, Todo>(&query))
        .bind(page.size)
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    Ok(Page::new(content, page, total))
}
