//! Rows a caller persists after a generation, and the store they go into.
//!
//! The generator itself never touches a store. [`TrackRecord`] is the row
//! shape for one variation; [`RecordStore`] is the CRUD boundary over
//! numbered tables. [`MemoryStore`] is an in-process implementation for
//! tests and the command line.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generate::Variation;

/// Numeric table identifier.
pub type TableId = u32;
pub type RecordId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("table {0} does not exist")]
    UnknownTable(TableId),
    #[error("record {0} not found")]
    NotFound(RecordId),
    #[error("record has no id")]
    MissingId,
    #[error("cannot filter or order by `{0}`")]
    UnknownField(String),
    #[error("page size must be at least 1")]
    EmptyPage,
    #[error("metadata is not valid json: {0}")]
    Metadata(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackStatus {
    Pending,
    Completed,
    Failed,
}

/// One generated track as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    pub id: Option<RecordId>,
    pub genre: String,
    pub prompt: String,
    pub bpm: u32,
    /// Whole seconds.
    pub duration: u32,
    /// Serialized [`VariationMetadata`](crate::generate::VariationMetadata).
    pub metadata: String,
    pub status: TrackStatus,
}

impl TrackRecord {
    pub fn from_variation(variation: &Variation, prompt: &str) -> Result<Self, RecordError> {
        let metadata = serde_json::to_string(&variation.metadata)
            .map_err(|err| RecordError::Metadata(err.to_string()))?;

        Ok(Self {
            id: None,
            genre: variation.metadata.genre.to_string(),
            prompt: prompt.to_string(),
            bpm: variation.metadata.bpm,
            duration: variation.duration_secs.floor() as u32,
            metadata,
            status: TrackStatus::Completed,
        })
    }

    fn field(&self, name: &str) -> Result<FieldValue<'_>, RecordError> {
        Ok(match name {
            "id" => FieldValue::Number(self.id.unwrap_or_default() as f64),
            "genre" => FieldValue::Text(&self.genre),
            "prompt" => FieldValue::Text(&self.prompt),
            "bpm" => FieldValue::Number(self.bpm as f64),
            "duration" => FieldValue::Number(self.duration as f64),
            "status" => FieldValue::Text(match self.status {
                TrackStatus::Pending => "pending",
                TrackStatus::Completed => "completed",
                TrackStatus::Failed => "failed",
            }),
            other => return Err(RecordError::UnknownField(other.to_string())),
        })
    }
}

enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl FieldValue<'_> {
    fn matches(&self, wanted: &str) -> bool {
        match self {
            FieldValue::Text(text) => *text == wanted,
            FieldValue::Number(n) => wanted.parse::<f64>().map_or(false, |w| w == *n),
        }
    }

    fn compare(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Text(_), FieldValue::Number(_)) => Ordering::Greater,
            (FieldValue::Number(_), FieldValue::Text(_)) => Ordering::Less,
        }
    }
}

/// Equality filter on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub value: String,
}

impl Filter {
    pub fn equal(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
    pub order_by: Option<String>,
    pub ascending: bool,
    pub filters: Vec<Filter>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            order_by: None,
            ascending: true,
            filters: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub items: Vec<TrackRecord>,
    /// Matching records across all pages.
    pub total: usize,
}

pub trait RecordStore {
    fn list(&self, table: TableId, query: &ListQuery) -> Result<Listing, RecordError>;

    /// Store `record` and return its new id. Any id already set is ignored.
    fn create(&mut self, table: TableId, record: &TrackRecord) -> Result<RecordId, RecordError>;

    /// Replace the record with `record.id`.
    fn update(&mut self, table: TableId, record: &TrackRecord) -> Result<(), RecordError>;

    fn delete(&mut self, table: TableId, id: RecordId) -> Result<(), RecordError>;
}

/// Tables live in memory. Ids are per store and never reused.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: BTreeMap<TableId, BTreeMap<RecordId, TrackRecord>>,
    next_id: RecordId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: TableId) -> Self {
        self.tables.entry(table).or_default();
        self
    }

    fn table(&self, table: TableId) -> Result<&BTreeMap<RecordId, TrackRecord>, RecordError> {
        self.tables.get(&table).ok_or(RecordError::UnknownTable(table))
    }

    fn table_mut(
        &mut self,
        table: TableId,
    ) -> Result<&mut BTreeMap<RecordId, TrackRecord>, RecordError> {
        self.tables
            .get_mut(&table)
            .ok_or(RecordError::UnknownTable(table))
    }
}

impl RecordStore for MemoryStore {
    fn list(&self, table: TableId, query: &ListQuery) -> Result<Listing, RecordError> {
        if query.page_size == 0 {
            return Err(RecordError::EmptyPage);
        }

        let mut items = Vec::new();
        for record in self.table(table)?.values() {
            let mut keep = true;
            for filter in &query.filters {
                keep &= record.field(&filter.field)?.matches(&filter.value);
            }
            if keep {
                items.push(record.clone());
            }
        }

        if let Some(field) = &query.order_by {
            // Surface a bad field even when there is nothing to sort
            if let Some(first) = items.first() {
                first.field(field)?;
            }
            items.sort_by(|a, b| match (a.field(field), b.field(field)) {
                (Ok(a), Ok(b)) => a.compare(&b),
                _ => Ordering::Equal,
            });
            if !query.ascending {
                items.reverse();
            }
        }

        let total = items.len();
        let skip = query.page.saturating_sub(1) * query.page_size;
        let items = items.into_iter().skip(skip).take(query.page_size).collect();
        Ok(Listing { items, total })
    }

    fn create(&mut self, table: TableId, record: &TrackRecord) -> Result<RecordId, RecordError> {
        self.next_id += 1;
        let id = self.next_id;
        let mut stored = record.clone();
        stored.id = Some(id);
        self.tables.entry(table).or_default().insert(id, stored);
        Ok(id)
    }

    fn update(&mut self, table: TableId, record: &TrackRecord) -> Result<(), RecordError> {
        let id = record.id.ok_or(RecordError::MissingId)?;
        let slot = self
            .table_mut(table)?
            .get_mut(&id)
            .ok_or(RecordError::NotFound(id))?;
        *slot = record.clone();
        Ok(())
    }

    fn delete(&mut self, table: TableId, id: RecordId) -> Result<(), RecordError> {
        self.table_mut(table)?
            .remove(&id)
            .map(|_| ())
            .ok_or(RecordError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TRACKS: TableId = 7;

    fn track(genre: &str, bpm: u32) -> TrackRecord {
        TrackRecord {
            id: None,
            genre: genre.to_string(),
            prompt: "test".to_string(),
            bpm,
            duration: 30,
            metadata: "{}".to_string(),
            status: TrackStatus::Completed,
        }
    }

    #[test]
    fn create_update_delete() {
        let mut store = MemoryStore::new();
        let id = store.create(TRACKS, &track("techno", 130)).unwrap();

        let mut record = store.list(TRACKS, &ListQuery::default()).unwrap().items[0].clone();
        assert_eq!(record.id, Some(id));

        record.status = TrackStatus::Failed;
        store.update(TRACKS, &record).unwrap();
        assert_eq!(
            store.list(TRACKS, &ListQuery::default()).unwrap().items[0].status,
            TrackStatus::Failed
        );

        store.delete(TRACKS, id).unwrap();
        assert_eq!(store.delete(TRACKS, id), Err(RecordError::NotFound(id)));
        assert_eq!(store.list(TRACKS, &ListQuery::default()).unwrap().total, 0);
    }

    #[test]
    fn update_needs_an_existing_id() {
        let mut store = MemoryStore::new().with_table(TRACKS);
        assert_eq!(
            store.update(TRACKS, &track("trap", 150)),
            Err(RecordError::MissingId)
        );

        let mut ghost = track("trap", 150);
        ghost.id = Some(99);
        assert_eq!(store.update(TRACKS, &ghost), Err(RecordError::NotFound(99)));
        assert_eq!(store.delete(3, 1), Err(RecordError::UnknownTable(3)));
    }

    #[test]
    fn list_filters_orders_and_pages() {
        let mut store = MemoryStore::new();
        for (genre, bpm) in [("techno", 140), ("trance", 136), ("techno", 128), ("techno", 150)] {
            store.create(TRACKS, &track(genre, bpm)).unwrap();
        }

        let query = ListQuery {
            page: 1,
            page_size: 2,
            order_by: Some("bpm".to_string()),
            ascending: false,
            filters: vec![Filter::equal("genre", "techno")],
        };
        let listing = store.list(TRACKS, &query).unwrap();
        assert_eq!(listing.total, 3);
        let bpms: Vec<u32> = listing.items.iter().map(|r| r.bpm).collect();
        assert_eq!(bpms, vec![150, 140]);

        let second = store.list(TRACKS, &ListQuery { page: 2, ..query.clone() }).unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].bpm, 128);

        let bad = ListQuery {
            filters: vec![Filter::equal("colour", "red")],
            ..ListQuery::default()
        };
        assert_eq!(
            store.list(TRACKS, &bad),
            Err(RecordError::UnknownField("colour".to_string()))
        );
    }

    #[test]
    fn record_serializes_camel_case() {
        let json = serde_json::to_value(track("dubstep", 145)).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["bpm"], 145);
    }
}
