//! Terminal hotel discovery map.
//!
//! Listings are loaded once, normalized at ingestion, then classified into
//! price tiers and filtered by the user's tier and minimum-rating selection.
//! Visible listings are projected onto a braille base map and grouped into
//! count-labelled clusters for the current viewport.

pub mod app;
pub mod braille;
pub mod config;
pub mod data;
pub mod error;
pub mod hotel;
pub mod map;
pub mod ui;
