//! Sharelinker - sharing captions, referral links and click tracking
//!
//! Backend for a mobile app's social sharing features. Three callable HTTP
//! endpoints and two scheduled jobs share one SQL store.
//!
//! # Modes
//! - `serve`: HTTP server plus scheduled jobs (default)
//! - `job` / `config`: one-shot job and config commands
//!
//! # Architecture
//! - `services`: caption generation, link issuing, click tracking
//! - `jobs`: retention cleanup, weekly report, scheduler
//! - `storage`: SeaORM storage backend and domain models
//! - `api`: callable endpoints, health checks, caller identity
//! - `config`: static configuration (TOML + `SL__` environment variables)
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging and panic reporting

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod jobs;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
