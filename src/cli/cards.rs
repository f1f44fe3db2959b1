use std::time::Duration;

use anyhow::Context;
use clap::Args;

use crate::catalog::source::{DataLoader, DataSource, SourceConfig, DEFAULT_CATALOG_URL};
use crate::catalog::store::CardCatalog;
use crate::catalog::view::{CardListView, ViewFilter};
use crate::cli::OutputFormat;
use crate::core::card::Card;
use crate::core::id::normalize;
use crate::render::caption::{image_path, split_title, DEFAULT_ICON_BASE};
use crate::utils::validation::parse_id_list;

#[derive(Args)]
pub struct CardsArgs {
    /// Card catalog CSV (path or http(s) URL)
    #[arg(long, default_value = DEFAULT_CATALOG_URL)]
    pub catalog: DataSource,

    /// Timeout in seconds for loading the catalog
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..=600))]
    pub timeout: u64,

    /// Hide N and R cards
    #[arg(long)]
    pub high_rarity_only: bool,

    /// Cards to select, comma separated player-facing IDs
    #[arg(long)]
    pub select: Option<String>,

    /// Toggle selection of every listed SR card
    #[arg(long)]
    pub select_all_sr: bool,

    /// URL or directory prefix for card icon images
    #[arg(long, default_value = DEFAULT_ICON_BASE)]
    pub icon_base: String,
}

/// Execute cards subcommand
///
/// # Errors
///
/// Returns an error if the selection is invalid or the catalog cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CardsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    // Validate the selection before loading anything
    let selection = match &args.select {
        Some(raw) => parse_id_list(raw).context("Invalid --select IDs")?,
        None => Vec::new(),
    };

    let config = SourceConfig {
        catalog: args.catalog.clone(),
        timeout: Duration::from_secs(args.timeout),
        ..SourceConfig::default()
    };
    let loader = DataLoader::new(config)?;
    let rt = tokio::runtime::Runtime::new()?;
    let catalog = rt
        .block_on(loader.load_catalog())
        .context("Failed to load card catalog")?;

    if verbose {
        eprintln!("Loaded {} cards from {}", catalog.len(), args.catalog);
    }

    let mut view = CardListView::new();
    if args.high_rarity_only {
        view.toggle_filter();
    }
    for id in selection {
        view.select(normalize(id));
    }
    if args.select_all_sr {
        let selected = view.toggle_all_sr(&catalog);
        if verbose {
            eprintln!(
                "{} all listed SR cards",
                if selected { "Selected" } else { "Deselected" }
            );
        }
    }

    match format {
        OutputFormat::Text => print_text(&view, &catalog),
        OutputFormat::Json => print_json(&view, &catalog, &args.icon_base)?,
        OutputFormat::Tsv => print_tsv(&view, &catalog),
    }

    Ok(())
}

fn print_text(view: &CardListView, catalog: &CardCatalog) {
    let cards = view.visible_cards(catalog);
    let label = match view.filter() {
        ViewFilter::ShowingAll => "all cards",
        ViewFilter::ShowingHighRarityOnly => "SR/SSR cards",
    };
    println!("{} {label}:", cards.len());

    for card in cards {
        let caption = split_title(&card.title);
        let marker = if view.is_selected(card.id) { "x" } else { " " };
        let name = match caption.character {
            Some(character) => format!("{} / {character}", caption.title),
            None => caption.title,
        };
        println!(
            "[{marker}] {:>4}  {:<3}  {name}",
            card.external_id(),
            card.rarity.to_string()
        );
    }

    println!("\nSelected ({}): {}", view.selected().len(), view.selected_id_string());
}

fn card_json(card: &Card, selected: bool, icon_base: &str) -> serde_json::Value {
    let caption = split_title(&card.title);
    serde_json::json!({
        "id": card.external_id(),
        "internal_id": card.id,
        "rarity": card.rarity,
        "title": caption.title,
        "character": caption.character,
        "series": card.series,
        "image": image_path(icon_base, card.id),
        "selected": selected,
    })
}

fn print_json(view: &CardListView, catalog: &CardCatalog, icon_base: &str) -> anyhow::Result<()> {
    let cards: Vec<serde_json::Value> = view
        .visible_cards(catalog)
        .into_iter()
        .map(|c| card_json(c, view.is_selected(c.id), icon_base))
        .collect();

    let output = serde_json::json!({
        "filter": view.filter(),
        "cards": cards,
        "selected": view.selected_id_string(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(view: &CardListView, catalog: &CardCatalog) {
    println!("id\tinternal_id\trarity\ttitle\tcharacter\tselected");
    for card in view.visible_cards(catalog) {
        let caption = split_title(&card.title);
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            card.external_id(),
            card.id,
            card.rarity,
            caption.title,
            caption.character.unwrap_or_default(),
            view.is_selected(card.id),
        );
    }
}
