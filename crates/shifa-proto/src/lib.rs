//! Core of the Shifa medicine and pharmacy browser: data model, catalog
//! client, and the UI-free list logic (filter, pager, loader, selection,
//! projection) shared by every view.

pub mod client;
pub mod config;
pub mod directory;
pub mod filter;
pub mod loader;
pub mod pagination;
pub mod platform;
pub mod projection;
pub mod protocol;
pub mod selection;
