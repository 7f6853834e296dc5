//! # Promptdeck CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/promptdeck/src/cli/)                     │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - Terminal rendering (render.rs), logging (logging.rs)     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (promptdeckapp::api)                             │
//! │  - Resolves id prefixes, dispatches to command modules      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from the API inward is UI agnostic. Errors surface here, are
//! printed to stderr, and turn into exit code 1.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
