//! # Configuration
//!
//! Promptdeck configuration is a [`confique`] config struct loaded from layered
//! sources.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `PROMPTDECK_DATA_DIR`, `PROMPTDECK_SEARCH_LIMIT`, etc.
//! 2. **Config file**: `promptdeck.toml` in the OS config directory (the CLI
//!    resolves it via `directories`). A missing file is fine.
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data dir | Where the template blobs live |
//! | `search_limit` | `50` | Default number of search results |
//! | `min_score` | `0.15` | Search hits scoring below this are dropped |
//! | `best_of_limit` | `5` | Default length of the best-of list |
//! | `best_of_min_uses` | `1` | Uses needed to enter the best-of list |
//! | `seed_presets` | `true` | Store the built-in presets on first run |

use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PromptDeckError, Result};
use crate::search::{Ranker, DEFAULT_LIMIT, DEFAULT_MIN_SCORE};

pub const CONFIG_FILE_NAME: &str = "promptdeck.toml";

/// Configuration for promptdeck, stored in `promptdeck.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PromptDeckConfig {
    /// Directory holding the template blobs. Unset means the OS data dir.
    #[config(env = "PROMPTDECK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[config(env = "PROMPTDECK_SEARCH_LIMIT", default = 50)]
    pub search_limit: usize,

    #[config(env = "PROMPTDECK_MIN_SCORE", default = 0.15)]
    pub min_score: f64,

    #[config(env = "PROMPTDECK_BEST_OF_LIMIT", default = 5)]
    pub best_of_limit: usize,

    #[config(env = "PROMPTDECK_BEST_OF_MIN_USES", default = 1)]
    pub best_of_min_uses: u32,

    /// Seed the built-in presets into an empty collection.
    #[config(env = "PROMPTDECK_SEED_PRESETS", default = true)]
    pub seed_presets: bool,
}

impl Default for PromptDeckConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            search_limit: DEFAULT_LIMIT,
            min_score: DEFAULT_MIN_SCORE,
            best_of_limit: 5,
            best_of_min_uses: 1,
            seed_presets: true,
        }
    }
}

impl PromptDeckConfig {
    /// Environment first, then `file` if given and present, then defaults.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        builder
            .load()
            .map_err(|e| PromptDeckError::Config(e.to_string()))
    }

    pub fn ranker(&self) -> Ranker {
        Ranker {
            min_score: self.min_score,
            default_limit: self.search_limit,
        }
    }
}
