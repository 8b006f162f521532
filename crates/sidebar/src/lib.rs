// ABOUTME: Main library entry point for folio's sidebar placement.
// ABOUTME: Re-exports page classification, sidebar lookup, relocation and the async SidebarClient.

//! Folio sidebar - moves per-page sidebars from a site's sidebars page into
//! the pages they belong to.
//!
//! Sidebars live as sections of one page (by default `/sidebars`). A marker
//! element inside each section names the page slug it is for, and its
//! `data-sidebar-*` attributes carry the styling. [`apply_sidebar`] does the
//! lookup and placement on HTML strings; [`SidebarClient`] fetches the
//! sidebars page first.

pub mod client;
pub mod error;
pub mod lookup;
pub mod options;
pub mod page;
pub mod relocate;
pub mod resource;
pub mod style;

pub use crate::client::{SidebarClient, SidebarOutcome};
pub use crate::error::{ErrorCode, SidebarError};
pub use crate::lookup::{find_sidebar, Sidebar};
pub use crate::options::{Options, SidebarClientBuilder, SidebarConfig};
pub use crate::page::{PageInfo, PageType};
pub use crate::relocate::{apply_sidebar, relocate};
pub use crate::style::SidebarStyle;
