//! # Core Application Logic
//!
//! This module contains Atlas's business logic.
//! It knows nothing about how countries are drawn.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (store, views) │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Runtime (tasks)      │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    CLI     │                          │    API     │
//!     │  Adapter   │                          │  (reqwest) │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `CountryStore` and the `App` aggregate
//! - [`search`]: the racing resolver behind the search field
//! - [`controller`]: query generations, debounce tickets, "no results" notice
//! - [`detail`]: single-country lookups and border labels
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`runtime`]: `Browser`, which spawns the work effects ask for
//! - [`config`]: layered settings

pub mod action;
pub mod config;
pub mod controller;
pub mod detail;
pub mod runtime;
pub mod search;
pub mod state;

pub use action::{Action, Effect};
pub use runtime::Browser;
pub use state::{App, LoadState};
