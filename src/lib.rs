// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod catalog;
pub mod config;
pub mod generator;
pub mod keys;
pub mod league;
pub mod roster;
pub mod salary;
pub mod scoring;
pub mod service;
pub mod standings;
pub mod store;
