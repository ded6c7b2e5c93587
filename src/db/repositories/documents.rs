use anyhow::{bail, Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, sections_from_json, sections_to_json},
    models::StoredDocument,
};
use crate::models::Document;
use crate::session::{DocumentSnapshot, DocumentStore, PersistFuture};

fn row_to_document(row: &Row) -> Result<StoredDocument> {
    let full_text: String = row.get("full_text")?;
    let sections_json: String = row.get("sections_json")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(StoredDocument {
        id: row.get("id")?,
        revision: row.get("revision")?,
        document: Document::new(full_text, sections_from_json(&sections_json)?),
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    /// Store a snapshot unless a newer revision is already stored.
    ///
    /// Re-sending the stored revision rewrites the row. Returns whether the
    /// row was written.
    pub async fn upsert_document(&self, snapshot: &DocumentSnapshot) -> Result<bool> {
        let id = snapshot.document_id.clone();
        let revision = snapshot.revision;
        let full_text = snapshot.document.full_text().to_string();
        let sections_json = sections_to_json(snapshot.document.sections())?;

        self.execute(move |conn| {
            let now = Utc::now().to_rfc3339();
            let written = conn
                .execute(
                    "INSERT INTO documents (id, revision, full_text, sections_json, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                     ON CONFLICT(id) DO UPDATE SET
                         revision = excluded.revision,
                         full_text = excluded.full_text,
                         sections_json = excluded.sections_json,
                         updated_at = excluded.updated_at
                     WHERE excluded.revision >= documents.revision",
                    params![id, revision, full_text, sections_json, now],
                )
                .with_context(|| format!("failed to upsert document {id}"))?;

            if written == 0 {
                log::info!("Ignored stale revision {revision} for document {id}");
            }
            Ok(written > 0)
        })
        .await
    }

    pub async fn latest_document(&self, id: &str) -> Result<Option<StoredDocument>> {
        let id = id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, revision, full_text, sections_json, created_at, updated_at
                 FROM documents
                 WHERE id = ?1",
            )?;
            let raw = stmt
                .query_row(params![id], |row| Ok(row_to_document(row)))
                .optional()
                .context("failed to load document")?;
            raw.transpose()
        })
        .await
    }
}

impl DocumentStore for Database {
    fn persist<'a>(&'a self, snapshot: &'a DocumentSnapshot) -> PersistFuture<'a> {
        Box::pin(async move {
            if !self.upsert_document(snapshot).await? {
                bail!(
                    "document {} is stored at a newer revision than {}",
                    snapshot.document_id,
                    snapshot.revision
                );
            }
            Ok(())
        })
    }
}
