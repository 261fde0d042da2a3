//! CSV export of the parallel corpus

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Local;
use halunder_common::SentencePair;
use tracing::info;

use crate::{
    api::{ApiError, ApiResult},
    db, AppState,
};

/// Byte-order mark so spreadsheet tools pick UTF-8
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const CSV_HEADERS: [&str; 10] = [
    "id",
    "text_id",
    "position",
    "halunder_text",
    "german_text",
    "match_confidence",
    "is_idiom",
    "reasoning",
    "source_title",
    "created_at",
];

/// GET /api/export
///
/// Renders every pair with text on both sides as a CSV attachment. The
/// snapshot is taken from the database at request time.
pub async fn export_csv(State(state): State<AppState>) -> ApiResult<Response> {
    let sentences = db::sentences::list_parallel(&state.db).await?;
    let body = render_csv(&sentences).map_err(|e| ApiError::Internal(e.to_string()))?;
    let filename = export_filename();

    info!(rows = sentences.len(), filename = %filename, "Exported parallel corpus");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        body,
    )
        .into_response())
}

fn export_filename() -> String {
    format!(
        "halunder_parallel_corpus_{}.csv",
        Local::now().format("%Y%m%d_%H%M%S")
    )
}

/// Serialize sentence pairs as BOM-prefixed CSV
pub fn render_csv(sentences: &[SentencePair]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(CSV_HEADERS)?;

    for s in sentences {
        writer.write_record([
            s.id.clone(),
            s.text_id.clone().unwrap_or_default(),
            s.position.map(|p| p.to_string()).unwrap_or_default(),
            s.halunder_text.clone(),
            s.german_text.clone(),
            s.match_confidence.map(|c| c.to_string()).unwrap_or_default(),
            s.is_idiom.to_string(),
            s.reasoning.clone().unwrap_or_default(),
            s.source_title.clone().unwrap_or_default(),
            s.created_at.clone().unwrap_or_default(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_csv_has_bom_header_and_quoting() {
        let mut pair = SentencePair::new("s1", "Moin, Frinjer", "Hallo, Freunde", Some(0.5));
        pair.source_title = Some("Lün".to_string());

        let bytes = render_csv(&[pair]).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,text_id,position,halunder_text,german_text,match_confidence,is_idiom,reasoning,source_title,created_at"
        );
        assert_eq!(
            lines.next().unwrap(),
            "s1,,,\"Moin, Frinjer\",\"Hallo, Freunde\",0.5,false,,Lün,"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_export_filename_shape() {
        let name = export_filename();
        assert!(name.starts_with("halunder_parallel_corpus_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "halunder_parallel_corpus_20250101_120000.csv".len());
    }
}
