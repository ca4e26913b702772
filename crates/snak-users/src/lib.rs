pub mod auth;
pub mod cache;
pub mod config;
pub mod state;
pub mod web;
