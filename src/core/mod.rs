//! # Core Application Logic
//!
//! This module contains Dossier's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                 ┌──────────────┴──────────────┐
//!                 ▼                             ▼
//!          ┌────────────┐               ┌────────────┐
//!          │    TUI     │               │    API     │
//!          │  Adapter   │               │  (reqwest) │
//!          │ (ratatui)  │               │            │
//!          └────────────┘               └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum, `update()` reducer, and `Effect`s
//! - [`config`]: Settings file, env vars, and CLI flag resolution

pub mod action;
pub mod config;
pub mod state;
