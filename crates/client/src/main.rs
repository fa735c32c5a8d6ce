//! Codex - command-line browser for the game reference dataset.

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codex_client::{App, AppConfig, ItemLookup};
use codex_domain::{CivAbbr, CivConfig, ChangeKind, ItemId, ItemKind, PatchHistoryEntry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional .env for local overrides.
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "codex_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    tracing::info!(data_root = %config.data_root, "starting codex");
    let app = App::new(config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("show") => show(&app, &args[1..]).await,
        Some("patch") => patch(&app, &args[1..]),
        Some("civs") => {
            for civ in codex_domain::civilizations() {
                println!("{:4} {}", civ.abbr, civ.name);
            }
            Ok(())
        }
        _ => bail!("usage: codex show <kind> <id> [civ...] | codex patch <id> | codex civs"),
    }
}

/// Print one item: summary, costs, and its full patch history.
async fn show(app: &App, args: &[String]) -> anyhow::Result<()> {
    let (kind, id) = match args {
        [kind, id, ..] => (kind.parse::<ItemKind>()?, ItemId::new(id.as_str())),
        _ => bail!("usage: codex show <kind> <id> [civ...]"),
    };
    let civs: Vec<CivAbbr> = args[2..]
        .iter()
        .map(|raw| raw.parse::<CivConfig>().map(|c| c.abbr))
        .collect::<Result<_, _>>()?;

    let lookup = app
        .item_or_closest(kind, &id, civs.first())
        .await
        .with_context(|| format!("failed to load {kind}"))?;

    let item = match lookup {
        Some(ItemLookup::Direct(item)) => item,
        Some(ItemLookup::Redirect(item)) => {
            println!("(no item '{id}'; showing closest match)");
            item
        }
        None => bail!("no item '{id}' in {kind}, and nothing close enough to it"),
    };

    println!("{} [{}]", item.name, item.canonical_key());
    if !item.description.is_empty() {
        println!("{}", item.description);
    }
    if !item.classes.is_empty() {
        println!("classes: {}", item.classes.join(", "));
    }
    if let Some(variation) = item.age_variation(civs.first(), 4) {
        let c = &variation.costs;
        println!(
            "costs: {}f {}w {}g {}s, {}s build time",
            c.food, c.wood, c.gold, c.stone, c.time
        );
    }

    let history = app.patch_history(&item, &civs);
    if history.is_empty() {
        println!("\nno recorded balance changes");
        return Ok(());
    }
    println!("\npatch history:");
    for entry in &history {
        print_history_entry(entry);
    }
    Ok(())
}

fn print_history_entry(entry: &PatchHistoryEntry<'_>) {
    println!("  {} — {}", entry.patch.date, entry.patch.name);
    for line in &entry.diff {
        let marker = match line.kind {
            ChangeKind::Buff => '+',
            ChangeKind::Nerf => '-',
            ChangeKind::Fix => '~',
        };
        if line.civs.is_empty() {
            println!("    {marker} {}", line.text);
        } else {
            let civs: Vec<&str> = line.civs.iter().map(|c| c.as_str()).collect();
            println!("    {marker} {} ({})", line.text, civs.join(", "));
        }
    }
}

/// Print one patch in full.
fn patch(app: &App, args: &[String]) -> anyhow::Result<()> {
    let id = match args {
        [id] => id,
        _ => bail!("usage: codex patch <id>"),
    };
    let Some(patch) = app.catalog.by_id(id) else {
        bail!("no patch '{id}' in the catalog");
    };

    println!("{} ({})", patch.name, patch.date);
    if !patch.summary.is_empty() {
        println!("{}", patch.summary);
    }
    for section in &patch.sections {
        if let Some(title) = &section.title {
            println!("\n## {title}");
        }
        for change in &section.changes {
            let items: Vec<&str> = change.items.iter().map(String::as_str).collect();
            println!("  [{}]", items.join(", "));
            for line in &change.diff {
                println!("    ({:?}) {}", line.kind, line.text);
            }
        }
    }
    Ok(())
}
