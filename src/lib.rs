//! SnapBook: a marketplace where clients book photographers.
//!
//! The HTTP API lives here; entities, migrations, shared transport types
//! and the booking-response timer live in the workspace crates.

pub mod auth;
pub mod cli;
pub mod config;
pub mod errors;
pub mod extract;
pub mod handlers;
pub mod mail;
pub mod router;
pub mod schemas;

pub mod test_utils;

#[cfg(test)]
mod openapi_tests;
#[cfg(test)]
mod tests;
