// Demo data for a fresh database

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::post::PostParts;
use crate::domain::repositories::{CommentRepository, PostRepository};
use crate::domain::{Comment, Post, PostContent, Tag};
use crate::infrastructure::repositories::db_error::database_error;
use crate::infrastructure::repositories::{PostgresCommentRepository, PostgresPostRepository};

pub const FIRST_TAG_ID: Uuid = Uuid::from_u128(0x39614113_7ad5_45b6_8093_06455437e1e2);
pub const SECOND_TAG_ID: Uuid = Uuid::from_u128(0xefd775e2_df55_4e0e_a308_58249f5ea202);

pub const FIRST_POST_ID: Uuid = Uuid::from_u128(0x6d308040_96a2_4162_bea6_2338e9976540);
pub const SECOND_POST_ID: Uuid = Uuid::from_u128(0xab04593b_da99_4fe3_8b4b_e06d82e2efdd);

pub const FIRST_USER_ID: Uuid = Uuid::from_u128(0x658170cb_b954_49f5_b905_ccf400000001);
pub const SECOND_USER_ID: Uuid = Uuid::from_u128(0x65817623_09c0_40b5_830e_051200000002);

const FIRST_COMMENT_ID: Uuid = Uuid::from_u128(0x0b6f0f3e_5d3a_4c7e_9a51_7c1d2e000001);
const SECOND_COMMENT_ID: Uuid = Uuid::from_u128(0x0b6f0f3e_5d3a_4c7e_9a51_7c1d2e000002);

fn at(timestamp: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap_or_default()
}

pub fn tags() -> Vec<Tag> {
    vec![
        Tag::from_persistence(FIRST_TAG_ID, "books".to_string()),
        Tag::from_persistence(SECOND_TAG_ID, "computers".to_string()),
    ]
}

/// Demo posts with the comments that belong to them
pub fn posts() -> Vec<(Post, Vec<Comment>)> {
    posts_tagged(&tags())
}

/// Demo posts linked to whichever of `tags` carry the demo titles
fn posts_tagged(tags: &[Tag]) -> Vec<(Post, Vec<Comment>)> {
    let tagged = |titles: &[&str]| -> Vec<Tag> {
        tags.iter()
            .filter(|t| titles.contains(&t.title()))
            .cloned()
            .collect()
    };

    let thinner = Post::from_persistence(PostParts {
        id: FIRST_POST_ID,
        original_id: FIRST_POST_ID,
        is_repost: false,
        is_draft: false,
        title: "Thinner: a Stephen King classic".to_string(),
        content: PostContent::Text {
            description: "In my opinion, one of the scariest novels Stephen King ever wrote."
                .to_string(),
            content: "Recently read the horror novel \"Thinner\". A cursed lawyer keeps \
                      losing weight, and the slow dread of every page stays with you long \
                      after the last chapter."
                .to_string(),
        },
        likes_count: 0,
        tags: tagged(&["books"]),
        comments: Vec::new(),
        user_id: FIRST_USER_ID,
        original_author: FIRST_USER_ID,
        created_at: at(1_704_877_200),
        updated_at: at(1_704_877_200),
    });

    let ydkjs = Post::from_persistence(PostParts {
        id: SECOND_POST_ID,
        original_id: SECOND_POST_ID,
        is_repost: false,
        is_draft: false,
        title: "You Don't Know JS, a deep dive".to_string(),
        content: PostContent::Text {
            description: "Secrets and hidden knowledge of JavaScript, explained one chapter \
                          at a time."
                .to_string(),
            content: "A genuinely useful book about JavaScript. It walks through scope, \
                      closures, this and prototypes, and explains the parts of the language \
                      most people only guess at."
                .to_string(),
        },
        likes_count: 0,
        tags: tagged(&["books", "computers"]),
        comments: Vec::new(),
        user_id: FIRST_USER_ID,
        original_author: FIRST_USER_ID,
        created_at: at(1_704_963_600),
        updated_at: at(1_704_963_600),
    });

    let comments = vec![
        Comment::from_persistence(
            FIRST_COMMENT_ID,
            SECOND_POST_ID,
            "This really is an excellent book!".to_string(),
            FIRST_USER_ID,
            at(1_704_967_200),
        ),
        Comment::from_persistence(
            SECOND_COMMENT_ID,
            SECOND_POST_ID,
            "Definitely worth a re-read. Way too much information for one pass.".to_string(),
            SECOND_USER_ID,
            at(1_704_970_800),
        ),
    ];

    vec![(thinner, Vec::new()), (ydkjs, comments)]
}

/// Inserts the demo data into PostgreSQL
///
/// Tags already present (by id or by title) are kept and the posts link to
/// the stored ones. Posts that already exist are skipped, so the function
/// can be run repeatedly.
pub async fn seed_database(pool: &PgPool) -> RepositoryResult<()> {
    let demo_tags = tags();
    for tag in &demo_tags {
        sqlx::query("INSERT INTO tags (id, title) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(tag.id())
            .bind(tag.title())
            .execute(pool)
            .await
            .map_err(|e| database_error("Failed to seed tag", e))?;
    }

    let titles: Vec<String> = demo_tags.iter().map(|t| t.title().to_string()).collect();
    let stored: Vec<Tag> =
        sqlx::query_as::<_, (Uuid, String)>("SELECT id, title FROM tags WHERE title = ANY($1)")
            .bind(&titles[..])
            .fetch_all(pool)
            .await
            .map_err(|e| database_error("Failed to load seed tags", e))?
            .into_iter()
            .map(|(id, title)| Tag::from_persistence(id, title))
            .collect();

    let post_repo = PostgresPostRepository::new(pool.clone());
    let comment_repo = PostgresCommentRepository::new(pool.clone());

    for (post, comments) in posts_tagged(&stored) {
        match post_repo.find_by_id(post.id()).await {
            Ok(_) => {
                tracing::info!(post_id = %post.id(), "Seed post already present, skipping");
                continue;
            }
            Err(RepositoryError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        post_repo.save(&post).await?;
        for comment in &comments {
            comment_repo.save(comment).await?;
        }
        tracing::info!(post_id = %post.id(), title = post.title(), "Seeded post");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_posts_reference_seed_tags() {
        let tag_ids: Vec<Uuid> = tags().iter().map(Tag::id).collect();
        for (post, comments) in posts() {
            assert!(post.tag_ids().iter().all(|id| tag_ids.contains(id)));
            assert!(comments.iter().all(|c| c.post_id() == post.id()));
        }
    }

    #[test]
    fn second_post_has_both_tags_and_two_comments() {
        let (post, comments) = posts().remove(1);
        assert_eq!(post.id(), SECOND_POST_ID);
        assert_eq!(post.tags().len(), 2);
        assert_eq!(comments.len(), 2);
    }

    #[test]
    fn seed_data_satisfies_entity_rules() {
        for (post, comments) in posts() {
            let rebuilt = Post::new(
                post.user_id(),
                post.title().to_string(),
                post.content().clone(),
                post.tags().to_vec(),
                post.is_draft(),
            );
            assert!(rebuilt.is_ok(), "{}: {:?}", post.title(), rebuilt.err());

            for comment in comments {
                assert!(Comment::new(comment.post_id(), comment.user_id(), comment.message()).is_ok());
            }
        }
    }

    #[test]
    fn posts_link_to_stored_tag_ids() {
        let stored = vec![
            Tag::from_persistence(Uuid::new_v4(), "computers".to_string()),
            Tag::from_persistence(Uuid::new_v4(), "books".to_string()),
        ];

        let (first, _) = posts_tagged(&stored).remove(0);
        let (second, _) = posts_tagged(&stored).remove(1);

        assert_eq!(first.tag_ids(), vec![stored[1].id()]);
        assert_eq!(second.tag_ids().len(), 2);
        assert!(second.tag_ids().iter().all(|id| stored.iter().any(|t| t.id() == *id)));
    }
}
