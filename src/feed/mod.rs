//! Incremental, paginated book feed.
//!
//! - [`query`] - categories, filter signatures and page request resolution
//! - [`state`] - accumulated records for the active signature
//! - [`controller`] - page issuing and stale-result rejection
//! - [`trigger`] - near-bottom detection for the scrolling view
//!
//! # Example
//!
//! ```ignore
//! let mut feed = FeedController::new();
//! if let Some(ticket) = feed.set_filter(FilterSignature::new(Category::Science, "")) {
//!     let outcome = client.fetch_page(&ticket.request).await;
//!     feed.apply(&ticket, outcome);
//! }
//! ```

mod controller;
mod query;
mod state;
mod trigger;

pub use controller::{Applied, FeedAdvisory, FeedController, PageTicket};
pub use query::{
    resolve, Category, Endpoint, FilterSignature, PageRequest, UnknownCategory, CATEGORIES,
    PAGE_SIZE,
};
pub use state::FeedState;
pub use trigger::{ScrollTrigger, ViewportMetrics};
