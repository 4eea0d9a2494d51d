//! Greenhouse DB - synthetic greenhouse sensor recorder and history API
//!
//! A background scheduler writes a generated reading every few seconds into an
//! append-only SQLite table; the history engine turns windows of that table into
//! chart series. This library exposes the core modules for testing and reuse.

pub mod common;
pub mod config;
pub mod entity;
pub mod error;
pub mod generator;
pub mod history;
pub mod ingest;
pub mod reading;
pub mod routes;
pub mod store;
