//! Edgemy pricing engine library crate.
//!
//! This crate exposes the marketplace's fee-splitting calculator and
//! its API components as reusable modules.  External applications may
//! depend on the `edgemy_pricing` crate and call into `engine::quote`
//! directly or embed the API via `api::build_router`.

pub mod api;
pub mod cards;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod money;
