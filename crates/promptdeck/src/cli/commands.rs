use super::logging::{self, Verbosity};
use super::render::{
    print_messages, render_facets, render_full_template, render_hits, render_index_stats,
    render_lint_report, render_prompt, render_ranked_list, render_template_list,
};
use super::setup::{Cli, Commands, CoreCommands, DataCommands, FieldArgs, TemplateCommands};
use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use directories::ProjectDirs;
use promptdeckapp::api::PromptDeckApi;
use promptdeckapp::config::{PromptDeckConfig, CONFIG_FILE_NAME};
use promptdeckapp::model::Quality;
use promptdeckapp::search::SearchQuery;
use promptdeckapp::store::fs::FileStore;
use std::path::{Path, PathBuf};

struct AppContext {
    api: PromptDeckApi<FileStore>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.verbose, cli.quiet));

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Core(cmd)) => match cmd {
            CoreCommands::List { pinned, favorites } => handle_list(&mut ctx, pinned, favorites),
            CoreCommands::Show { id } => handle_show(&mut ctx, &id),
            CoreCommands::Search {
                query,
                tags,
                category,
                min_quality,
                limit,
            } => {
                let text = if query.is_empty() {
                    None
                } else {
                    Some(query.join(" "))
                };
                let query = SearchQuery {
                    text,
                    tags,
                    category,
                    min_quality,
                    limit,
                };
                handle_search(&mut ctx, &query)
            }
            CoreCommands::Best { limit, min_uses } => handle_best(&mut ctx, limit, min_uses),
        },
        Some(Commands::Template(cmd)) => match cmd {
            TemplateCommands::Save(fields) => handle_save(&mut ctx, &fields),
            TemplateCommands::Create(fields) => handle_create(&mut ctx, &fields),
            TemplateCommands::Edit { id, fields } => handle_edit(&mut ctx, &id, &fields),
            TemplateCommands::Variant { id, fields } => handle_variant(&mut ctx, &id, &fields),
            TemplateCommands::Delete { ids } => handle_delete(&mut ctx, &ids),
            TemplateCommands::Pin { ids } => handle_pinned(&mut ctx, &ids, true),
            TemplateCommands::Unpin { ids } => handle_pinned(&mut ctx, &ids, false),
            TemplateCommands::Favorite { ids } => handle_favorite(&mut ctx, &ids, true),
            TemplateCommands::Unfavorite { ids } => handle_favorite(&mut ctx, &ids, false),
            TemplateCommands::Use { id } => handle_use(&mut ctx, &id),
            TemplateCommands::Success { id } => handle_success(&mut ctx, &id),
            TemplateCommands::Lint(fields) => handle_lint(&ctx, &fields),
        },
        Some(Commands::Data(cmd)) => match cmd {
            DataCommands::Tags => handle_tags(&mut ctx),
            DataCommands::Export { ids, output } => handle_export(&mut ctx, &ids, output.as_deref()),
            DataCommands::Import { file } => handle_import(&mut ctx, &file),
            DataCommands::Reindex => handle_reindex(&mut ctx),
        },
        None => handle_list(&mut ctx, false, false),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let dirs = ProjectDirs::from("com", "promptdeck", "promptdeck");
    let config_file = dirs
        .as_ref()
        .map(|d| d.config_dir().join(CONFIG_FILE_NAME));
    let config = PromptDeckConfig::load(config_file.as_deref())?;

    let data_dir: PathBuf = cli
        .data_dir
        .clone()
        .or_else(|| config.data_dir.clone())
        .or_else(|| dirs.as_ref().map(|d| d.data_dir().to_path_buf()))
        .context("Could not determine a data directory; pass --data-dir")?;
    tracing::debug!(data_dir = %data_dir.display(), "opening template store");

    let store = FileStore::open(data_dir).with_seed_presets(config.seed_presets);
    Ok(AppContext {
        api: PromptDeckApi::with_config(store, &config),
    })
}

fn handle_list(ctx: &mut AppContext, pinned: bool, favorites: bool) -> Result<()> {
    let result = if pinned {
        ctx.api.get_pinned()?
    } else if favorites {
        ctx.api.get_favorites()?
    } else {
        ctx.api.get_all()?
    };
    print!("{}", render_template_list(&result.listed));
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &mut AppContext, id: &str) -> Result<()> {
    let id = ctx.api.resolve_id(id)?;
    let result = ctx.api.get(&id)?;
    for template in &result.listed {
        print!("{}", render_full_template(template));
    }
    Ok(())
}

fn handle_search(ctx: &mut AppContext, query: &SearchQuery) -> Result<()> {
    let result = ctx.api.search(query)?;
    print!("{}", render_hits(&result.hits, &result.listed));
    print_messages(&result.messages);
    Ok(())
}

fn handle_best(ctx: &mut AppContext, limit: Option<usize>, min_uses: Option<u32>) -> Result<()> {
    let result = ctx.api.best_of(limit, min_uses)?;
    if result.listed.is_empty() {
        println!("{}", "No templates have been used enough yet.".dimmed());
        return Ok(());
    }
    print!("{}", render_ranked_list(&result.listed));
    Ok(())
}

fn handle_save(ctx: &mut AppContext, fields: &FieldArgs) -> Result<()> {
    let saved = ctx.api.upsert(&fields.to_draft())?;
    print_messages(&saved.result.messages);
    Ok(())
}

fn handle_create(ctx: &mut AppContext, fields: &FieldArgs) -> Result<()> {
    let result = ctx.api.create(&fields.to_draft())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, id: &str, fields: &FieldArgs) -> Result<()> {
    let patch = fields.to_patch();
    if patch.is_empty() {
        bail!("Nothing to change: pass at least one field flag");
    }
    let id = ctx.api.resolve_id(id)?;
    let result = ctx.api.update_by_id(&id, &patch)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_variant(ctx: &mut AppContext, id: &str, fields: &FieldArgs) -> Result<()> {
    let id = ctx.api.resolve_id(id)?;
    let result = ctx.api.derive_variant(&id, &fields.to_patch())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, ids: &[String]) -> Result<()> {
    let ids = ctx.api.resolve_ids(ids)?;
    let result = ctx.api.delete_many(&ids)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_pinned(ctx: &mut AppContext, ids: &[String], pinned: bool) -> Result<()> {
    let ids = ctx.api.resolve_ids(ids)?;
    let result = ctx.api.set_pinned(&ids, pinned)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_favorite(ctx: &mut AppContext, ids: &[String], favorite: bool) -> Result<()> {
    let ids = ctx.api.resolve_ids(ids)?;
    let result = ctx.api.set_favorite(&ids, favorite)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_use(ctx: &mut AppContext, id: &str) -> Result<()> {
    let id = ctx.api.resolve_id(id)?;
    let result = ctx.api.apply_usage(&id)?;
    for template in &result.affected {
        print!("{}", render_prompt(template));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_success(ctx: &mut AppContext, id: &str) -> Result<()> {
    let id = ctx.api.resolve_id(id)?;
    let result = ctx.api.record_success(&id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_lint(ctx: &AppContext, fields: &FieldArgs) -> Result<()> {
    let report = ctx.api.validate(&fields.to_draft());
    print!("{}", render_lint_report(&report));
    if report.quality == Quality::Red {
        bail!("Template would be rejected");
    }
    Ok(())
}

fn handle_tags(ctx: &mut AppContext) -> Result<()> {
    let tags = ctx.api.list_tags()?;
    let categories = ctx.api.list_categories()?;
    print!("{}", render_facets("Tags", &tags));
    print!("{}", render_facets("Categories", &categories));
    Ok(())
}

fn handle_export(ctx: &mut AppContext, ids: &[String], output: Option<&Path>) -> Result<()> {
    let selected = if ids.is_empty() {
        None
    } else {
        Some(ctx.api.resolve_ids(ids)?)
    };
    let json = ctx.api.export_all(selected.as_deref())?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{}", format!("Exported to {}", path.display()).green());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn handle_import(ctx: &mut AppContext, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let summary = ctx.api.import_all(&json)?;
    if !summary.success {
        bail!("{}", summary.message);
    }
    if summary.persisted {
        println!("{}", summary.message.green());
    } else {
        println!("{}", summary.message.yellow());
    }
    Ok(())
}

fn handle_reindex(ctx: &mut AppContext) -> Result<()> {
    let stats = ctx.api.reindex()?;
    print!("{}", render_index_stats(&stats));
    Ok(())
}
