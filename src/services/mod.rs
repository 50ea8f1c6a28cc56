//! Resource services
//!
//! Thin typed accessors over the transport. Paginated collections (stories,
//! activity) go through a [`Cursor`](crate::pagination::Cursor); everything
//! else is one GET.

mod accounts;
mod activity;
mod projects;
mod stories;

pub use accounts::{
    AccountMembershipService, AccountService, EpicService, IterationService, MembershipService,
};
pub use activity::{ActivityQuery, ActivityService};
pub use projects::{MeService, ProjectService, SearchService};
pub use stories::StoryService;

use crate::error::Result;
use crate::http::{ApiRequest, Transport};
use crate::types::JsonValue;

/// Issue one request and decode its body as plain JSON
async fn get_value(transport: &dyn Transport, request: ApiRequest) -> Result<JsonValue> {
    transport.issue(request).await?.json()
}

#[cfg(test)]
mod tests;
