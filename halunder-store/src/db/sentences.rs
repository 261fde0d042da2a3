//! Sentence-pair queries: full listing, partial update, delete, export

use halunder_common::{SentencePair, SentencePatch};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};

const SELECT_WITH_METADATA: &str = r#"
    SELECT s.id, s.text_id, s.position, s.halunder_text, s.german_text,
           s.match_confidence, s.is_idiom, s.reasoning, s.created_at,
           t.source_title, t.source_author, t.source_page, t.added_by
    FROM sentences s
    LEFT JOIN texts t ON t.id = s.text_id
"#;

/// Every sentence pair joined with its source text's metadata
///
/// Ordered by creation, ties broken by insertion order, so the listing is
/// stable across calls.
pub async fn list_with_metadata(pool: &SqlitePool) -> sqlx::Result<Vec<SentencePair>> {
    let sql = format!("{} ORDER BY s.created_at ASC, s.rowid ASC", SELECT_WITH_METADATA);
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    rows.iter().map(row_to_pair).collect()
}

/// Fetch one sentence pair with metadata
pub async fn get(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<SentencePair>> {
    let sql = format!("{} WHERE s.id = ?", SELECT_WITH_METADATA);
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    row.as_ref().map(row_to_pair).transpose()
}

/// Apply a partial update; `None` when no sentence has this id
///
/// Only the fields present in the patch are written.
pub async fn update(
    pool: &SqlitePool,
    id: &str,
    patch: &SentencePatch,
) -> sqlx::Result<Option<SentencePair>> {
    if patch.is_empty() {
        return get(pool, id).await;
    }

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE sentences SET ");
    {
        let mut set = qb.separated(", ");
        if let Some(text) = &patch.halunder_text {
            set.push("halunder_text = ").push_bind_unseparated(text.clone());
        }
        if let Some(text) = &patch.german_text {
            set.push("german_text = ").push_bind_unseparated(text.clone());
        }
        if let Some(confidence) = patch.match_confidence {
            set.push("match_confidence = ").push_bind_unseparated(confidence);
        }
        if let Some(reasoning) = &patch.reasoning {
            set.push("reasoning = ").push_bind_unseparated(reasoning.clone());
        }
    }
    qb.push(" WHERE id = ").push_bind(id.to_string());

    let result = qb.build().execute(pool).await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get(pool, id).await
}

/// Delete one sentence pair; false when no sentence has this id
pub async fn delete(pool: &SqlitePool, id: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM sentences WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Sentence pairs with text on both sides, for the CSV export
pub async fn list_parallel(pool: &SqlitePool) -> sqlx::Result<Vec<SentencePair>> {
    let sql = format!(
        "{} WHERE COALESCE(s.halunder_text, '') <> '' AND COALESCE(s.german_text, '') <> '' \
         ORDER BY s.created_at ASC, s.rowid ASC",
        SELECT_WITH_METADATA
    );
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    rows.iter().map(row_to_pair).collect()
}

fn row_to_pair(row: &SqliteRow) -> sqlx::Result<SentencePair> {
    Ok(SentencePair {
        id: row.try_get("id")?,
        halunder_text: row
            .try_get::<Option<String>, _>("halunder_text")?
            .unwrap_or_default(),
        german_text: row
            .try_get::<Option<String>, _>("german_text")?
            .unwrap_or_default(),
        match_confidence: row.try_get("match_confidence")?,
        source_title: row.try_get("source_title")?,
        reasoning: row.try_get("reasoning")?,
        text_id: row.try_get("text_id")?,
        position: row.try_get("position")?,
        is_idiom: row.try_get("is_idiom")?,
        source_author: row.try_get("source_author")?,
        source_page: row.try_get("source_page")?,
        added_by: row.try_get("added_by")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_in_memory, texts::insert_text_with_sentences};
    use halunder_common::models::{NewSentence, NewText};

    async fn seeded_pool() -> SqlitePool {
        let pool = init_in_memory().await.unwrap();
        let text = NewText {
            content: "Moin. Wat maakst du?".to_string(),
            language: "halunder".to_string(),
            source_title: Some("Helgoländer Gespräche".to_string()),
            added_by: "Jakob".to_string(),
            sentences: vec![
                NewSentence {
                    halunder_text: Some("Moin.".to_string()),
                    german_text: Some("Hallo.".to_string()),
                    match_confidence: Some(0.9),
                    ..Default::default()
                },
                NewSentence {
                    halunder_text: Some("Wat maakst du?".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        insert_text_with_sentences(&pool, &text).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_listing_joins_source_metadata_in_order() {
        let pool = seeded_pool().await;
        let pairs = list_with_metadata(&pool).await.unwrap();

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].halunder_text, "Moin.");
        assert_eq!(pairs[1].german_text, "");
        assert_eq!(pairs[1].position, Some(1));
        assert!(pairs
            .iter()
            .all(|p| p.source_title.as_deref() == Some("Helgoländer Gespräche")));
        assert_eq!(pairs[0].added_by.as_deref(), Some("Jakob"));
    }

    #[tokio::test]
    async fn test_update_writes_only_present_fields() {
        let pool = seeded_pool().await;
        let id = list_with_metadata(&pool).await.unwrap()[1].id.clone();

        let patch = SentencePatch {
            german_text: Some("Was machst du?".to_string()),
            match_confidence: Some(0.75),
            ..Default::default()
        };
        let updated = update(&pool, &id, &patch).await.unwrap().unwrap();

        assert_eq!(updated.halunder_text, "Wat maakst du?");
        assert_eq!(updated.german_text, "Was machst du?");
        assert_eq!(updated.match_confidence, Some(0.75));
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let pool = seeded_pool().await;
        let patch = SentencePatch {
            reasoning: Some("x".to_string()),
            ..Default::default()
        };
        assert!(update(&pool, "missing", &patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_parallel_listing_skips_incomplete_pairs() {
        let pool = seeded_pool().await;
        let parallel = list_parallel(&pool).await.unwrap();

        assert_eq!(parallel.len(), 1);
        assert_eq!(parallel[0].german_text, "Hallo.");
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = seeded_pool().await;
        let id = list_with_metadata(&pool).await.unwrap()[0].id.clone();

        assert!(delete(&pool, &id).await.unwrap());
        assert!(!delete(&pool, &id).await.unwrap());
        assert_eq!(list_with_metadata(&pool).await.unwrap().len(), 1);
    }
}
