// src/handlers/mod.rs

pub mod analysis;
pub mod auth;
pub mod questions;
pub mod scores;
