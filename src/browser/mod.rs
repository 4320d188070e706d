//! Chrome backend
//!
//! - [`BrowserSession`]: launches or attaches to a browser and hands out pages
//! - [`ChromePage`]: the [`crate::page::PageModel`] over a live tab
//! - [`config`]: launch, connection and page timing options

pub mod config;
pub mod page;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions, PageOptions};
pub use page::ChromePage;
pub use session::BrowserSession;
