//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `auth.rs` — login/register/logout/status.
//! - `stock.rs` — stock list/select/CRUD (the working-context picker).
//! - `shelf.rs` — shelf list/CRUD, grid rendering, cell inspection, pick.
//! - `product.rs` — product list/CRUD/adjust and template lookups.
//! - `draft.rs` — the product form: set/show/select-position/save/clear.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod auth;
pub mod draft;
pub mod product;
pub mod shelf;
pub mod stock;
