//! Lazy pagination cursor

use super::types::{PageWindow, PaginationState, RequestFactory, StaleCountSnapshot};
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::models::json_type_name;
use crate::types::JsonValue;
use futures::stream::{self, Stream};
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Forward-only, non-restartable iterator over a paged collection.
///
/// Items are handed out in the order the server returned them, page after
/// page. To iterate again, build a new cursor; it will probe again and may
/// see a different total.
pub struct Cursor<T> {
    transport: Arc<dyn Transport>,
    factory: Box<dyn RequestFactory>,
    page_size: u64,
    snapshot: StaleCountSnapshot,
    state: PaginationState,
    buffer: VecDeque<JsonValue>,
    _item: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Cursor<T> {
    /// Probe the collection and create a cursor over it.
    ///
    /// `page_size` 0 fetches the whole collection in one request sized to
    /// the probed total.
    pub async fn new(
        transport: Arc<dyn Transport>,
        factory: impl RequestFactory + 'static,
        page_size: u32,
    ) -> Result<Self> {
        let response = transport.issue(factory.request(PageWindow::probe())).await?;
        let total = response
            .pagination()
            .total
            .ok_or(Error::MissingPaginationTotal)?;

        debug!(total, page_size, "Pagination probe complete");

        Ok(Self {
            transport,
            factory: Box::new(factory),
            page_size: u64::from(page_size),
            snapshot: StaleCountSnapshot::new(total),
            state: PaginationState::new(),
            buffer: VecDeque::new(),
            _item: PhantomData,
        })
    }

    /// Total reported by the probe
    pub fn total(&self) -> StaleCountSnapshot {
        self.snapshot
    }

    /// Pagination progress so far
    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Items fetched but not yet handed out
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Whether `next` will only ever return `None` from now on
    pub fn is_exhausted(&self) -> bool {
        self.state.done && self.buffer.is_empty()
    }

    /// Return the next item, fetching a page first if the buffer is empty.
    ///
    /// `Ok(None)` marks the end of the sequence. A transport failure is
    /// returned once and ends iteration. An item that fails to decode is
    /// returned as an error in its place and iteration continues after it.
    pub async fn next(&mut self) -> Result<Option<T>> {
        if self.buffer.is_empty() && !self.state.done {
            self.fetch_page().await?;
        }

        match self.buffer.pop_front() {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Drain the remaining items in order
    pub async fn all(&mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Consume the cursor as a stream of items
    pub fn into_stream(self) -> impl Stream<Item = Result<T>> {
        stream::unfold(self, |mut cursor| async move {
            match cursor.next().await {
                Ok(Some(item)) => Some((Ok(item), cursor)),
                Ok(None) => None,
                Err(e) => Some((Err(e), cursor)),
            }
        })
    }

    async fn fetch_page(&mut self) -> Result<()> {
        if !self.snapshot.covers(self.state.offset) {
            self.state.mark_done();
            return Ok(());
        }

        let limit = if self.page_size == 0 {
            self.snapshot.total()
        } else {
            self.page_size
        };
        let window = PageWindow::new(self.state.offset, limit);

        let items = match self.request_page(window).await {
            Ok(items) => items,
            Err(e) => {
                self.state.mark_done();
                return Err(e);
            }
        };

        self.state.record_page(items.len());
        debug!(
            offset = window.offset,
            limit = window.limit,
            received = items.len(),
            "Fetched page"
        );

        if items.is_empty() {
            if self.snapshot.covers(self.state.total_fetched) {
                debug!(
                    fetched = self.state.total_fetched,
                    total = self.snapshot.total(),
                    "Empty page before reported total"
                );
            }
            self.state.mark_done();
            return Ok(());
        }

        self.state.add_offset(limit);
        self.buffer.extend(items);
        Ok(())
    }

    async fn request_page(&self, window: PageWindow) -> Result<Vec<JsonValue>> {
        let response = self.transport.issue(self.factory.request(window)).await?;
        match response.json::<JsonValue>()? {
            JsonValue::Array(items) => Ok(items),
            other => Err(Error::decode(format!(
                "expected a page array, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

impl<T> std::fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("page_size", &self.page_size)
            .field("snapshot", &self.snapshot)
            .field("state", &self.state)
            .field("buffered", &self.buffer.len())
            .finish_non_exhaustive()
    }
}
