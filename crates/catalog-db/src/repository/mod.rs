//! # Repository Module
//!
//! Database repository implementations for the catalog.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                     │
//! │                                                                     │
//! │  The Repository pattern abstracts database access behind a clean    │
//! │  API.                                                               │
//! │                                                                     │
//! │  Caller                                                             │
//! │       │                                                             │
//! │       │  db.items().search("coffee")                                │
//! │       │  ↓                                                          │
//! │       ▼                                                             │
//! │  ItemRepository                                                     │
//! │  ├── search(&self, keyword)                                         │
//! │  ├── get_by_id(&self, id)                                           │
//! │  ├── insert(&self, item)                                            │
//! │  └── update(&self, item)                                            │
//! │       │                                                             │
//! │       │  SQL Query                                                  │
//! │       ▼                                                             │
//! │  SQLite Database                                                    │
//! │                                                                     │
//! │  Benefits:                                                          │
//! │  • Clean separation of concerns                                     │
//! │  • SQL is isolated in one place                                     │
//! │  • Can swap database implementations                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`category::CategoryRepository`] - Category CRUD and name lookup
//! - [`product::ProductRepository`] - Product CRUD with eager item fetch
//! - [`item::ItemRepository`] - Item CRUD and keyword search

pub mod category;
pub mod item;
pub mod product;
