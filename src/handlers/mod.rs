//! # Handlers
//!
//! [`pages`] renders the HTML site, [`api`] serves the same content as JSON.

pub mod api;
pub mod pages;

#[cfg(test)]
mod tests;
