//! # Mall Site Library
//!
//! Server-rendered website for a shopping centre: tenant directory, news and
//! events, cinema showtimes, promotions and a contact form, plus a JSON API
//! over the same content. Reads fall back to bundled data when the database
//! is unavailable.

pub mod blog;
pub mod cinema;
pub mod clock;
pub mod config;
pub mod contact;
pub mod data;
pub mod db;
pub mod directory;
pub mod error;
pub mod handlers;
pub mod models;
pub mod promotions;
pub mod repositories;
pub mod seeds;
pub mod seo;
pub mod server;
pub mod telemetry;
pub mod views;
pub use migration;
