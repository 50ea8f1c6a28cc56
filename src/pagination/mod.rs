//! Pagination module
//!
//! Lazy, offset-based iteration over large filtered collections.
//!
//! # Overview
//!
//! A [`Cursor`] first issues a zero-length probe to learn the collection's
//! total size, then fetches `limit`/`offset` pages on demand as the caller
//! pulls items. The total is a snapshot taken at probe time and is never
//! refreshed; an empty page also ends iteration, whichever comes first.
//!
//! ```rust,ignore
//! let factory = ListRequest::new("projects/99/stories").query("filter", "state:started");
//! let mut cursor: Cursor<Story> = Cursor::new(transport, factory, 10).await?;
//! while let Some(story) = cursor.next().await? {
//!     println!("{}", story.name);
//! }
//! ```

mod cursor;
mod types;

pub use cursor::Cursor;
pub use types::{ListRequest, PageWindow, PaginationState, RequestFactory, StaleCountSnapshot};
