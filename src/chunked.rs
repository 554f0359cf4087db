use std::collections::VecDeque;

use async_trait::async_trait;
use thiserror::Error;

/// Rows paged by a strictly increasing integer column.
pub trait PaginationKey {
    fn pagination_key(&self) -> i64;
}

/// A read query that can be narrowed to `field > after AND field <= up_to`.
#[async_trait]
pub trait RangeQuery: Send + Sync {
    type Row: PaginationKey + Send;

    fn is_read_only(&self) -> bool;

    /// Rows of one window, ordered by `field`.
    async fn fetch_range(&self, field: &str, after: i64, up_to: i64) -> anyhow::Result<Vec<Self::Row>>;
}

#[derive(Debug, Error)]
pub enum ChunkedQueryError {
    #[error("chunked iteration needs a read query")]
    NotAReadQuery,
    #[error("chunk size must be at least 1, got {0}")]
    InvalidChunkSize(i64),
    #[error("pagination field {0:?} is not a plain column name")]
    InvalidField(String),
    #[error("pagination field {field} is not strictly increasing: {key} after {previous}")]
    DuplicateKey { field: String, key: i64, previous: i64 },
    #[error(transparent)]
    Query(#[from] anyhow::Error),
}

/// Lazy, forward-only row sequence over `(offset_start, max_offset]`.
///
/// Each refill re-issues the query for the window
/// `(window_start, min(max_offset, window_start + chunk_size)]`, so at most
/// one chunk is buffered and the database never has to skip deep offsets.
/// Keys must be unique: a repeated or decreasing key fails the sequence.
pub struct ChunkedQueryResultIterator<'a, Q: RangeQuery> {
    query: &'a Q,
    field: String,
    chunk_size: i64,
    max_offset: i64,
    window_start: i64,
    buffer: VecDeque<Q::Row>,
    last_key: Option<i64>,
}

impl<'a, Q: RangeQuery> ChunkedQueryResultIterator<'a, Q> {
    pub fn new(
        query: &'a Q,
        field: &str,
        chunk_size: i64,
        max_offset: i64,
        offset_start: i64,
    ) -> Result<Self, ChunkedQueryError> {
        if !query.is_read_only() {
            return Err(ChunkedQueryError::NotAReadQuery);
        }
        if chunk_size < 1 {
            return Err(ChunkedQueryError::InvalidChunkSize(chunk_size));
        }
        if !is_plain_identifier(field) {
            return Err(ChunkedQueryError::InvalidField(field.to_string()));
        }
        Ok(Self {
            query,
            field: field.to_string(),
            chunk_size,
            max_offset,
            window_start: offset_start,
            buffer: VecDeque::new(),
            last_key: None,
        })
    }

    pub async fn next(&mut self) -> Result<Option<Q::Row>, ChunkedQueryError> {
        loop {
            if let Some(row) = self.buffer.pop_front() {
                let key = row.pagination_key();
                if let Some(previous) = self.last_key {
                    if key <= previous {
                        return Err(ChunkedQueryError::DuplicateKey { field: self.field.clone(), key, previous });
                    }
                }
                self.last_key = Some(key);
                return Ok(Some(row));
            }
            if self.window_start >= self.max_offset {
                return Ok(None);
            }
            let window_end = self.max_offset.min(self.window_start.saturating_add(self.chunk_size));
            tracing::debug!(field = %self.field, after = self.window_start, up_to = window_end, "fetch chunk");
            let rows = self.query.fetch_range(&self.field, self.window_start, window_end).await?;
            self.buffer.extend(rows);
            self.window_start = window_end;
        }
    }
}

fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
