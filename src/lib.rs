// SPDX-License-Identifier: MIT

//! QuitPuff: track smoking habits and the money saved by quitting.
//!
//! This crate provides the backend API for logging smoke events and
//! computing savings against a personal baseline.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
}
