//! Authentication module
//!
//! The Tracker API authenticates every request with a static API token sent
//! in the `X-TrackerToken` header. There is no token exchange or refresh.

mod authenticator;
mod types;

pub use authenticator::{Authenticator, TOKEN_HEADER};
pub use types::TrackerToken;
