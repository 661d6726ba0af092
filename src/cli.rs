//! Command-line front end: parses user commands, drives the store, renders
//! its state as text or JSON.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::catalog::{Meal, MealFilter, MealPatch, NewMeal, Page, ValidationError};
use crate::config::Config;
use crate::fetch::HttpMealSource;
use crate::storage::FileStore;
use crate::store::{MealStore, StoreOptions};
use crate::thumbnail;

#[derive(Debug, Parser)]
#[command(name = "mealdeck", version, about = "Browse, like and curate a meal catalog")]
pub struct Cli {
    /// Config file (default: ~/.config/mealdeck/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the directory the catalog is stored in
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the remote catalog and merge meals not seen before
    Fetch,

    /// List meals, one page at a time
    List {
        /// all, liked or deleted
        #[arg(long, default_value = "all")]
        filter: MealFilter,

        /// Case-insensitive text to look for in titles and descriptions
        #[arg(long, default_value = "")]
        search: String,

        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Print the page as JSON
        #[arg(long)]
        json: bool,

        /// Never fetch, even when the catalog is empty
        #[arg(long)]
        offline: bool,
    },

    /// Show one meal in full
    Show {
        id: String,

        /// Print the meal as JSON
        #[arg(long)]
        json: bool,

        /// Never fetch, even when the catalog is empty
        #[arg(long)]
        offline: bool,
    },

    /// Like a meal, or unlike it if already liked
    Like { id: String },

    /// Soft-delete a meal, or restore it if already deleted
    Delete { id: String },

    /// Create a custom meal
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        #[command(flatten)]
        thumbnail: ThumbnailArgs,
    },

    /// Edit title, description or cover image of a meal
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[command(flatten)]
        thumbnail: ThumbnailArgs,
    },
}

#[derive(Debug, Args)]
#[group(multiple = false)]
pub struct ThumbnailArgs {
    /// JPEG, PNG or WebP file to embed as the cover (max 5 MiB)
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Remote image URL to use as the cover
    #[arg(long, value_name = "URL")]
    pub thumbnail_url: Option<String>,
}

impl ThumbnailArgs {
    fn resolve(&self) -> anyhow::Result<Option<String>> {
        if let Some(path) = &self.image {
            return Ok(Some(thumbnail::load_image(path)?));
        }
        Ok(self.thumbnail_url.clone())
    }
}

/// Load config, open the store and run one command against stdout.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&config_path)?;
    if let Some(dir) = cli.data_dir {
        config.storage.dir = Some(dir);
    }

    let source = HttpMealSource::new(config.source.clone())?;
    let storage = FileStore::new(config.storage.resolved_dir());
    tracing::debug!(dir = %storage.dir().display(), "Using storage directory");

    let store = MealStore::open(
        Arc::new(source),
        Arc::new(storage),
        StoreOptions::from(&config),
    )
    .context("Failed to open catalog")?;

    let mut out = io::stdout();
    execute(&store, cli.command, &mut out).await
}

/// Run one command against an open store.
pub async fn execute<W: Write>(
    store: &MealStore,
    command: Command,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Command::Fetch => {
            let report = store.fetch_and_merge().await?;
            writeln!(
                out,
                "Fetched {} meals, {} new.",
                report.fetched, report.inserted
            )?;
        }
        Command::List {
            filter,
            search,
            page,
            json,
            offline,
        } => {
            ensure_loaded(store, offline).await?;
            store.set_filter(filter);
            store.set_search_term(search);
            store.set_page(page);

            let page = store.page();
            if json {
                serde_json::to_writer_pretty(&mut *out, &page)?;
                writeln!(out)?;
            } else {
                render_page(out, &page, store.filter())?;
            }
        }
        Command::Show { id, json, offline } => {
            ensure_loaded(store, offline).await?;
            let meal = find(store, &id)?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &meal)?;
                writeln!(out)?;
            } else {
                render_meal(out, &meal)?;
            }
        }
        Command::Like { id } => {
            find(store, &id)?;
            store.toggle_like(&id)?;
            let meal = find(store, &id)?;
            let verb = if meal.liked { "Liked" } else { "Unliked" };
            writeln!(out, "{} '{}'", verb, meal.title)?;
        }
        Command::Delete { id } => {
            find(store, &id)?;
            store.toggle_delete(&id)?;
            let meal = find(store, &id)?;
            let verb = if meal.deleted { "Deleted" } else { "Restored" };
            writeln!(out, "{} '{}'", verb, meal.title)?;
        }
        Command::Add {
            title,
            description,
            thumbnail,
        } => {
            let thumbnail_url = thumbnail
                .resolve()?
                .ok_or(ValidationError::MissingThumbnail)?;
            let new_meal = NewMeal {
                title: title.trim().to_string(),
                description: description.trim().to_string(),
                thumbnail_url,
            };
            new_meal.validate()?;

            let meal = store.add_custom_meal(new_meal)?;
            writeln!(out, "{}", meal.id)?;
        }
        Command::Edit {
            id,
            title,
            description,
            thumbnail,
        } => {
            find(store, &id)?;
            let patch = MealPatch {
                title: title.map(|t| t.trim().to_string()),
                description: description.map(|d| d.trim().to_string()),
                thumbnail_url: thumbnail.resolve()?,
            };
            patch.validate()?;

            store.update_meal(&id, patch)?;
            writeln!(out, "Updated {}", id)?;
        }
    }
    Ok(())
}

/// The detail and list views fetch on first use, like a page load would.
async fn ensure_loaded(store: &MealStore, offline: bool) -> anyhow::Result<()> {
    if offline || !store.is_empty() {
        return Ok(());
    }
    tracing::info!("Catalog is empty, fetching");
    store.fetch_and_merge().await?;
    Ok(())
}

fn find(store: &MealStore, id: &str) -> anyhow::Result<Meal> {
    match store.get(id) {
        Some(meal) => Ok(meal),
        None => bail!("No meal with id '{}'", id),
    }
}

fn flags(meal: &Meal) -> String {
    [
        if meal.liked { 'L' } else { '-' },
        if meal.deleted { 'D' } else { '-' },
        if meal.is_custom { 'C' } else { '-' },
    ]
    .iter()
    .collect()
}

/// Data URIs are long; show their media type and size instead.
fn display_thumbnail(url: &str) -> String {
    match url.strip_prefix("data:") {
        Some(rest) => {
            let media_type = rest.split(';').next().unwrap_or("");
            format!("embedded {} ({} bytes)", media_type, url.len())
        }
        None => url.to_string(),
    }
}

fn render_page<W: Write>(out: &mut W, page: &Page, filter: MealFilter) -> io::Result<()> {
    if page.total_items == 0 {
        return writeln!(out, "No meals match (filter: {}).", filter);
    }
    for meal in &page.items {
        writeln!(out, "{}  {}  {}", flags(meal), meal.id, meal.title)?;
    }
    writeln!(
        out,
        "Page {} of {} ({} meals, filter: {})",
        page.number, page.total_pages, page.total_items, filter
    )
}

fn render_meal<W: Write>(out: &mut W, meal: &Meal) -> io::Result<()> {
    writeln!(out, "{}", meal.title)?;
    writeln!(out, "id:        {}", meal.id)?;
    writeln!(out, "flags:     {}", flags(meal))?;
    writeln!(out, "thumbnail: {}", display_thumbnail(&meal.thumbnail_url))?;
    writeln!(out)?;
    writeln!(out, "{}", meal.description)
}
