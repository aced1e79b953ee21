use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::db_error::{database_error, is_foreign_key_violation};
use super::rows::{CommentRow, ContentColumns, PostRow, PostTagRow, POST_COLUMNS};
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::query::{PaginationResult, PostQuery, SearchQuery};
use crate::domain::repositories::PostRepository;
use crate::domain::{Comment, Post, Tag};

/// PostgreSQL implementation of PostRepository
///
/// Posts live in a single table with nullable per-type columns. Tags and
/// comments are loaded with one extra query each for a whole batch of posts.
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    /// Creates a new PostgresPostRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attaches tags and comments to a batch of rows, keeping row order
    async fn load_relations(&self, rows: Vec<PostRow>) -> RepositoryResult<Vec<Post>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let tags_query = sqlx::query_as::<_, PostTagRow>(
            r#"
            SELECT pt.post_id, t.id, t.title
            FROM post_tags pt
            JOIN tags t ON t.id = pt.tag_id
            WHERE pt.post_id = ANY($1)
            ORDER BY t.title
            "#,
        )
        .bind(&ids[..])
        .fetch_all(&self.pool);

        let comments_query = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, message, user_id, created_at
            FROM comments
            WHERE post_id = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(&ids[..])
        .fetch_all(&self.pool);

        let (tag_rows, comment_rows) = tokio::try_join!(tags_query, comments_query)
            .map_err(|e| database_error("Failed to load post relations", e))?;

        let mut tags: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for row in tag_rows {
            tags.entry(row.post_id)
                .or_default()
                .push(Tag::from_persistence(row.id, row.title));
        }

        let mut comments: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for row in comment_rows {
            comments.entry(row.post_id).or_default().push(row.into());
        }

        rows.into_iter()
            .map(|row| {
                let post_tags = tags.remove(&row.id).unwrap_or_default();
                let post_comments = comments.remove(&row.id).unwrap_or_default();
                row.into_post(post_tags, post_comments)
            })
            .collect()
    }

    async fn insert_tag_links(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        post_id: Uuid,
        tag_ids: &[Uuid],
    ) -> RepositoryResult<()> {
        if tag_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO post_tags (post_id, tag_id)
            SELECT $1, UNNEST($2::uuid[])
            "#,
        )
        .bind(post_id)
        .bind(tag_ids)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                RepositoryError::InvalidReference("Unknown tag".to_string())
            } else {
                database_error("Failed to link post tags", e)
            }
        })?;

        Ok(())
    }
}

/// Appends the "has any of these tags" condition
fn push_tag_filter(builder: &mut QueryBuilder<'_, Postgres>, tags: &[Uuid]) {
    if tags.is_empty() {
        return;
    }

    builder.push(
        " WHERE EXISTS (SELECT 1 FROM post_tags pt WHERE pt.post_id = p.id AND pt.tag_id = ANY(",
    );
    builder.push_bind(tags.to_vec());
    builder.push("))");
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn save(&self, post: &Post) -> RepositoryResult<()> {
        let columns = ContentColumns::from(post.content());
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database_error("Failed to begin transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO posts (
                id, original_id, is_repost, is_draft, type, title,
                description, content, video_url, quote, quote_author,
                photo_url, link_url, likes_count, user_id, original_author,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(post.id())
        .bind(post.original_id())
        .bind(post.is_repost())
        .bind(post.is_draft())
        .bind(post.post_type())
        .bind(post.title())
        .bind(columns.description)
        .bind(columns.content)
        .bind(columns.video_url)
        .bind(columns.quote)
        .bind(columns.quote_author)
        .bind(columns.photo_url)
        .bind(columns.link_url)
        .bind(post.likes_count())
        .bind(post.user_id())
        .bind(post.original_author())
        .bind(post.created_at())
        .bind(post.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| database_error("Failed to save post", e))?;

        Self::insert_tag_links(&mut tx, post.id(), &post.tag_ids()).await?;

        tx.commit()
            .await
            .map_err(|e| database_error("Failed to commit post", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Post> {
        let sql = format!("SELECT {} FROM posts p WHERE p.id = $1", POST_COLUMNS);
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("Failed to find post by id", e))?
            .ok_or_else(|| RepositoryError::not_found("Post", id))?;

        self.load_relations(vec![row])
            .await?
            .pop()
            .ok_or_else(|| RepositoryError::not_found("Post", id))
    }

    async fn update(&self, post: &Post) -> RepositoryResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database_error("Failed to begin transaction", e))?;

        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(post.id())
        .bind(post.title())
        .bind(post.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| database_error("Failed to update post", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Post", post.id()));
        }

        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(post.id())
            .execute(&mut *tx)
            .await
            .map_err(|e| database_error("Failed to unlink post tags", e))?;

        Self::insert_tag_links(&mut tx, post.id(), &post.tag_ids()).await?;

        tx.commit()
            .await
            .map_err(|e| database_error("Failed to commit post update", e))?;

        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("Failed to delete post", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Post", id));
        }

        Ok(())
    }

    async fn find(&self, query: &PostQuery) -> RepositoryResult<PaginationResult<Post>> {
        let direction = query.sort_direction.as_sql();
        let offset = i64::try_from(query.offset()).unwrap_or(i64::MAX);

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM posts p", POST_COLUMNS));
        push_tag_filter(&mut select, &query.tags);
        select.push(format!(
            " ORDER BY p.created_at {}, p.id {}",
            direction, direction
        ));
        select.push(" LIMIT ");
        select.push_bind(i64::from(query.limit));
        select.push(" OFFSET ");
        select.push_bind(offset);

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM posts p");
        push_tag_filter(&mut count, &query.tags);

        let (rows, total) = tokio::try_join!(
            select.build_query_as::<PostRow>().fetch_all(&self.pool),
            count.build_query_scalar::<i64>().fetch_one(&self.pool),
        )
        .map_err(|e| database_error("Failed to find posts", e))?;

        let posts = self.load_relations(rows).await?;
        let total = u64::try_from(total).unwrap_or_default();

        Ok(PaginationResult::new(posts, query, total))
    }

    async fn search(&self, query: &SearchQuery) -> RepositoryResult<Vec<Post>> {
        // strpos keeps % and _ in the search string literal
        let sql = format!(
            "SELECT {} FROM posts p WHERE strpos(p.title, $1) > 0 \
             ORDER BY p.created_at DESC, p.id DESC LIMIT $2",
            POST_COLUMNS
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(&query.title)
            .bind(i64::from(query.limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("Failed to search posts", e))?;

        self.load_relations(rows).await
    }
}
