#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod config;
pub mod entities;
pub mod error;
pub mod framework;
pub mod processors;
pub mod state;
pub mod store;
pub mod wallet;

#[cfg(test)]
mod testing;
