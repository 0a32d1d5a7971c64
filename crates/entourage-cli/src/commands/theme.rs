use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use entourage_core::{Theme, ThemeStore};
use entourage_store::{paths, FilePreferences};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Print the active theme
    Show(ThemeArgs),
    /// Switch between light and dark
    Toggle(ThemeArgs),
    /// Set the theme explicitly
    Set(SetThemeArgs),
}

#[derive(Debug, Args)]
pub struct ThemeArgs {
    /// Treat the system as preferring dark when nothing is saved
    #[arg(long)]
    pub prefers_dark: bool,
}

#[derive(Debug, Args)]
pub struct SetThemeArgs {
    /// `light` or `dark`
    pub theme: Theme,
    #[arg(long)]
    pub prefers_dark: bool,
}

#[derive(Debug, Serialize)]
struct ThemeReport {
    theme: Theme,
    path: PathBuf,
}

type CliThemeStore = ThemeStore<FilePreferences, fn(Theme)>;

fn apply_to_terminal(theme: Theme) {
    debug!(theme = %theme, "color scheme applied");
}

fn load_store(ctx: &Context<'_>, prefers_dark: bool) -> Result<CliThemeStore> {
    let db_path = ctx.db_path()?;
    let storage = FilePreferences::new(paths::preferences_path_for(&db_path));
    let mut store = ThemeStore::load(storage, apply_to_terminal as fn(Theme), prefers_dark)
        .with_context(|| "load theme preference")?;
    store.subscribe(|theme| debug!(theme = %theme, "theme changed"));
    Ok(store)
}

fn report(ctx: &Context<'_>, store: &CliThemeStore) -> Result<()> {
    let report = ThemeReport {
        theme: store.current(),
        path: store.storage().path().to_path_buf(),
    };
    if ctx.json {
        return print_json(&report);
    }
    println!("Theme: {}", report.theme);
    Ok(())
}

pub fn show(ctx: &Context<'_>, args: ThemeArgs) -> Result<()> {
    let store = load_store(ctx, args.prefers_dark)?;
    report(ctx, &store)
}

pub fn toggle(ctx: &Context<'_>, args: ThemeArgs) -> Result<()> {
    let mut store = load_store(ctx, args.prefers_dark)?;
    store.toggle().with_context(|| "save theme preference")?;
    report(ctx, &store)
}

pub fn set(ctx: &Context<'_>, args: SetThemeArgs) -> Result<()> {
    let mut store = load_store(ctx, args.prefers_dark)?;
    store
        .set(args.theme)
        .with_context(|| "save theme preference")?;
    report(ctx, &store)
}
