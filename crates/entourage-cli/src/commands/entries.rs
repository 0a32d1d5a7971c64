use crate::commands::{print_json, Context};
use crate::util::{format_timestamp, or_dash};
use anyhow::{Context as _, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct MigrateReport {
    schema_version: i64,
    entries: i64,
}

pub fn migrate(ctx: &Context<'_>) -> Result<()> {
    let store = ctx.open_store()?;
    let report = MigrateReport {
        schema_version: store.schema_version().with_context(|| "read schema version")?,
        entries: store.waitlist().count().with_context(|| "count entries")?,
    };

    if ctx.json {
        return print_json(&report);
    }
    println!(
        "Schema version {} ({} waitlist entries)",
        report.schema_version, report.entries
    );
    Ok(())
}

pub fn list(ctx: &Context<'_>) -> Result<()> {
    let store = ctx.open_store()?;
    let entries = store
        .waitlist()
        .list()
        .with_context(|| "list waitlist entries")?;

    if ctx.json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("No waitlist entries.");
        return Ok(());
    }
    for entry in &entries {
        println!(
            "{}  {}  {}  {}",
            format_timestamp(entry.created_at),
            entry.email,
            or_dash(entry.name.as_deref()),
            or_dash(entry.company.as_deref())
        );
    }
    Ok(())
}
