//! # CLI Behavior
//!
//! This is **one possible UI client** for promptdeck, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//!
//! ## Naked Execution
//!
//! Running `promptdeck` with no arguments lists the saved templates.
//!
//! ## Ids
//!
//! Lists show the first 8 characters of each template id. Every command that
//! takes an id accepts the full id or any unambiguous prefix of 4 or more
//! characters.
//!
//! ## Save vs Create
//!
//! - `promptdeck save --name ... --subject ...` merges into an existing template
//!   with identical content (tags are unioned).
//! - `promptdeck create ...` always stores a new record.
//!
//! Both refuse templates the linter grades red. `promptdeck lint` shows the
//! grade without saving.
//!
//! ## Data Location
//!
//! `--data-dir` wins, then `data_dir` from `promptdeck.toml` or
//! `PROMPTDECK_DATA_DIR`, then the OS data directory.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup and per-command handlers that call the API
//! - `logging`: tracing subscriber setup
//! - `render`: Output formatting (rows, full view, hits, facets)
//! - `setup`: Argument parsing via clap

mod commands;
mod logging;
mod render;
pub mod setup;

pub use commands::run;
