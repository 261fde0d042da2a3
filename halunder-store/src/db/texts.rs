//! Source texts and their extracted sentence pairs

use chrono::Utc;
use halunder_common::models::NewText;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Persist one source text together with its sentence pairs
///
/// Runs in a single transaction; returns the new text id and the number of
/// sentence rows written. Sentences without an explicit position keep their
/// order in the request.
pub async fn insert_text_with_sentences(
    pool: &SqlitePool,
    text: &NewText,
) -> sqlx::Result<(String, u64)> {
    let text_id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO texts (
            id, content, language, text_type, source_title, source_author,
            source_page, source_date, proofread, proofread_by, added_by, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&text_id)
    .bind(&text.content)
    .bind(&text.language)
    .bind(&text.text_type)
    .bind(&text.source_title)
    .bind(&text.source_author)
    .bind(&text.source_page)
    .bind(&text.source_date)
    .bind(text.proofread)
    .bind(&text.proofread_by)
    .bind(&text.added_by)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    let mut inserted = 0;
    for (index, sentence) in text.sentences.iter().enumerate() {
        inserted += sqlx::query(
            r#"
            INSERT INTO sentences (
                id, text_id, position, halunder_text, german_text,
                match_confidence, is_idiom, reasoning, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&text_id)
        .bind(sentence.position.unwrap_or(index as i64))
        .bind(&sentence.halunder_text)
        .bind(&sentence.german_text)
        .bind(sentence.match_confidence)
        .bind(sentence.is_idiom)
        .bind(&sentence.reasoning)
        .bind(&now)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;

    tracing::info!(
        text_id = %text_id,
        language = %text.language,
        sentences = inserted,
        "Stored source text"
    );

    Ok((text_id, inserted))
}
