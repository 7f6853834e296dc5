use clap::{Args, Parser, Subcommand};
use promptdeckapp::model::{Quality, TemplateDraft, TemplatePatch};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "promptdeck",
    bin_name = "promptdeck",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Save, lint and search structured image prompt templates", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Debug logging on stderr
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, help_heading = "Options")]
    pub quiet: bool,

    /// Directory holding the template data (overrides the config file)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Core(CoreCommands),

    #[command(flatten)]
    Template(TemplateCommands),

    #[command(flatten)]
    Data(DataCommands),
}

#[derive(Subcommand, Debug)]
pub enum CoreCommands {
    /// List templates
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Only pinned templates
        #[arg(long, conflicts_with = "favorites")]
        pinned: bool,

        /// Only favorite templates
        #[arg(long)]
        favorites: bool,
    },

    /// Show one template in full
    #[command(alias = "v", display_order = 2)]
    Show {
        /// Template id or id prefix
        id: String,
    },

    /// Ranked search over the prompt fields, with tag and category filters
    #[command(display_order = 3)]
    Search {
        /// Free-text query (words are joined with spaces)
        #[arg(num_args = 0..)]
        query: Vec<String>,

        /// Require a tag (repeatable)
        #[arg(long = "tag", short = 't', value_name = "TAG")]
        tags: Vec<String>,

        /// Restrict to a category ("All" means any)
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// Lowest acceptable lint grade (red, amber, green)
        #[arg(long, value_name = "GRADE")]
        min_quality: Option<Quality>,

        /// Maximum number of results
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Most successful templates
    #[command(display_order = 4)]
    Best {
        /// Maximum number of results
        #[arg(long, short = 'n')]
        limit: Option<usize>,

        /// Uses needed to qualify
        #[arg(long)]
        min_uses: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// Save a template, merging into an identical one if it exists
    #[command(display_order = 10)]
    Save(FieldArgs),

    /// Create a template, even if an identical one exists
    #[command(alias = "n", display_order = 11)]
    Create(FieldArgs),

    /// Change fields of a template
    #[command(alias = "e", display_order = 12)]
    Edit {
        /// Template id or id prefix
        id: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Create a new template derived from an existing one
    #[command(display_order = 13)]
    Variant {
        /// Parent template id or id prefix
        id: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete one or more templates
    #[command(alias = "rm", display_order = 14)]
    Delete {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Pin one or more templates
    #[command(alias = "p", display_order = 15)]
    Pin {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Unpin one or more templates
    #[command(alias = "u", display_order = 16)]
    Unpin {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Mark one or more templates as favorite
    #[command(alias = "fav", display_order = 17)]
    Favorite {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Remove the favorite mark
    #[command(display_order = 18)]
    Unfavorite {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Apply a template: counts a use and prints the prompt
    #[command(display_order = 19)]
    Use {
        /// Template id or id prefix
        id: String,
    },

    /// Record a render you were happy with
    #[command(display_order = 20)]
    Success {
        /// Template id or id prefix
        id: String,
    },

    /// Grade template fields without saving
    #[command(display_order = 21)]
    Lint(FieldArgs),
}

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Tags and categories in use
    #[command(display_order = 30)]
    Tags,

    /// Export templates as JSON
    #[command(display_order = 31)]
    Export {
        /// Template ids or prefixes; all templates when omitted
        #[arg(num_args = 0..)]
        ids: Vec<String>,

        /// Write to a file instead of stdout
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Import templates from a JSON file
    #[command(display_order = 32)]
    Import {
        /// Path to a JSON array of templates
        file: PathBuf,
    },

    /// Rebuild the search index
    #[command(display_order = 33)]
    Reindex,
}

/// Template fields shared by save, create, edit, variant and lint.
#[derive(Args, Debug, Default, Clone)]
pub struct FieldArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub subject: Option<String>,

    #[arg(long)]
    pub action: Option<String>,

    #[arg(long)]
    pub environment: Option<String>,

    #[arg(long)]
    pub style: Option<String>,

    #[arg(long)]
    pub lighting: Option<String>,

    #[arg(long)]
    pub camera: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Tag (repeatable)
    #[arg(long = "tag", short = 't', value_name = "TAG")]
    pub tags: Vec<String>,
}

impl FieldArgs {
    /// A full draft; missing fields are blank.
    pub fn to_draft(&self) -> TemplateDraft {
        TemplateDraft {
            name: self.name.clone().unwrap_or_default(),
            subject: self.subject.clone().unwrap_or_default(),
            action: self.action.clone().unwrap_or_default(),
            environment: self.environment.clone().unwrap_or_default(),
            style: self.style.clone().unwrap_or_default(),
            lighting: self.lighting.clone().unwrap_or_default(),
            camera: self.camera.clone().unwrap_or_default(),
            category: self.category.clone().unwrap_or_default(),
            tags: self.tags.clone(),
        }
    }

    /// Only the given fields. Any `--tag` replaces the whole tag set.
    pub fn to_patch(&self) -> TemplatePatch {
        TemplatePatch {
            name: self.name.clone(),
            subject: self.subject.clone(),
            action: self.action.clone(),
            environment: self.environment.clone(),
            style: self.style.clone(),
            lighting: self.lighting.clone(),
            camera: self.camera.clone(),
            category: self.category.clone(),
            tags: (!self.tags.is_empty()).then(|| self.tags.clone()),
            ..Default::default()
        }
    }
}
