//! Output generation: JSON snapshots and the static HTML page.
//!
//! - [`json`]: persists one [`crate::models::NewsSnapshot`] per day under the
//!   data directory (`company-news-YYYY-MM-DD.json`) and reads it back for
//!   rendering.
//! - [`html`]: renders a snapshot into a single static HTML card page.

pub mod html;
pub mod json;
