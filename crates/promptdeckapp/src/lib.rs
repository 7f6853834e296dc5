//! # Promptdeck Architecture
//!
//! Promptdeck is a **UI-agnostic library for structured image prompt templates**.
//! It saves templates, grades them with a linter, de-duplicates them by content
//! signature and keeps an inverted index for ranked search. The `promptdeck`
//! binary is one client of it.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (promptdeck crate)                                     │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (id prefixes → UUIDs)                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Pure business logic, returns Rust types                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DataStore trait, TemplateStore over a StorageBackend     │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Underneath the store sit the pure building blocks: [`canonical`] (the
//! normal form every draft is reduced to), [`signature`] (content identity),
//! [`lint`] (quality grade), [`tokenize`] and [`index`] (inverted index) and
//! [`search`] (ranking).
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits
//! the process. Diagnostics go through `tracing`; the binary decides where
//! they end up.
//!
//! ## Testing Strategy
//!
//! 1. **Building blocks and commands**: unit tests next to the code, against
//!    `InMemoryStore` and the fixtures in `store::memory::fixtures`.
//! 2. **API** (`api.rs`): dispatch and id resolution.
//! 3. **Filesystem**: `tests/fs_backend_test.rs` against a temp dir.
//! 4. **CLI**: end-to-end runs of the binary in the `promptdeck` crate.

pub mod api;
pub mod canonical;
pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod lint;
pub mod model;
pub mod presets;
pub mod search;
pub mod signature;
pub mod store;
pub mod tokenize;
