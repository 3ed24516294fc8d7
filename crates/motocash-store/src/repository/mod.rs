//! # Repository Module
//!
//! Database repository implementations for MotoCash.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CLI command                                                           │
//! │       │                                                                 │
//! │       │  db.state().load()                                              │
//! │       ▼                                                                 │
//! │  StateRepository                                                       │
//! │  ├── load(&self)            → AppState                                  │
//! │  └── save(&self, state)     (one transaction)                           │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite database (app_state table)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`state::StateRepository`] - The three document sections

pub mod state;
