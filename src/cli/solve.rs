use anyhow::Context;
use clap::Args;

use crate::catalog::source::DataLoader;
use crate::cli::{OutputFormat, SourceArgs};
use crate::core::types::{CardId, MatchPass};
use crate::render::caption::DEFAULT_ICON_BASE;
use crate::matching::engine::{MatchThresholds, MatchingConfig};
use crate::render::results::{
    render_outcome, RenderOptions, RenderedCard, RenderedOutcome, DEFAULT_HIGHLIGHT,
    DEFAULT_RELAXED_HIGHLIGHT,
};
use crate::session::{CalcError, Calculation, Calculator};

/// Client key for command-line calculations
const CLI_CLIENT: &str = "cli";

#[derive(Args)]
pub struct MatchArgs {
    /// Owned card IDs, comma separated (e.g. "12,45,381")
    #[arg(required = true)]
    pub ids: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Never fall back to the relaxed pass
    #[arg(long)]
    pub no_relax: bool,

    /// List decks one core card short of a strict match instead
    #[arg(long)]
    pub near_miss: bool,

    // === Threshold options ===
    /// Owned quad cards needed for a strong match (support owned)
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u8).range(0..=4))]
    pub strong_min: u8,

    /// Owned quad cards needed for a borrow match (support not owned)
    #[arg(long, default_value = "4", value_parser = clap::value_parser!(u8).range(0..=4))]
    pub borrow_min: u8,

    /// Relaxed-pass threshold with a support card owned
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(0..=4))]
    pub relaxed_strong_min: u8,

    /// Relaxed-pass threshold without a support card owned
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u8).range(0..=4))]
    pub relaxed_borrow_min: u8,

    // === Rendering options ===
    /// Highlight colour for unowned cards in strict results
    #[arg(long, default_value = DEFAULT_HIGHLIGHT)]
    pub highlight: String,

    /// Highlight colour for unowned cards in relaxed results
    #[arg(long, default_value = DEFAULT_RELAXED_HIGHLIGHT)]
    pub relaxed_highlight: String,

    /// Maximum number of matches to show
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// URL or directory prefix for card icon images
    #[arg(long, default_value = DEFAULT_ICON_BASE)]
    pub icon_base: String,
}

impl MatchArgs {
    pub fn matching_config(&self) -> MatchingConfig {
        let strict = MatchThresholds {
            strong_min_quad: usize::from(self.strong_min),
            borrow_min_quad: usize::from(self.borrow_min),
        };
        let relaxed = (!self.no_relax).then(|| MatchThresholds {
            strong_min_quad: usize::from(self.relaxed_strong_min),
            borrow_min_quad: usize::from(self.relaxed_borrow_min),
        });

        MatchingConfig {
            strict,
            relaxed,
            near_miss: self.near_miss,
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            highlight: self.highlight.clone(),
            relaxed_highlight: self.relaxed_highlight.clone(),
            limit: self.limit,
            icon_base: self.icon_base.clone(),
        }
    }
}

/// Execute match subcommand
///
/// # Errors
///
/// Returns an error if the input is invalid or the data cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: MatchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let loader = DataLoader::new(args.source.to_config())?;
    let calculator = Calculator::new(loader, args.matching_config());

    let rt = tokio::runtime::Runtime::new()?;
    let calculation = rt
        .block_on(calculator.calculate(CLI_CLIENT, &args.ids))
        .map_err(|e| match e {
            CalcError::Input(input) => anyhow::anyhow!("Invalid card IDs: {input}"),
            other => anyhow::Error::new(other).context("Calculation failed"),
        })?;

    if verbose {
        eprintln!(
            "Loaded {} cards; {} of {} input IDs are usable SR/SSR cards",
            calculation.catalog.len(),
            calculation.owned.len(),
            calculation.input_ids.len()
        );
        if calculation.skipped_solutions > 0 {
            eprintln!(
                "Skipped {} malformed solution entries",
                calculation.skipped_solutions
            );
        }
    }

    let rendered = render_outcome(
        &calculation.outcome,
        &calculation.owned,
        &calculation.catalog,
        &args.render_options(),
    );

    match format {
        OutputFormat::Text => print_text_results(&rendered, verbose),
        OutputFormat::Json => print_json_results(&rendered, &calculation)?,
        OutputFormat::Tsv => print_tsv_results(&rendered),
    }

    Ok(())
}

fn card_line(card: &RenderedCard) -> String {
    let name = match &card.character {
        Some(character) => format!("{} / {}", card.title, character),
        None => card.title.clone(),
    };
    let marker = if card.owned { " " } else { "*" };
    format!("{marker} {:>4}  {:<3}  {name}", card.id, card.rarity.to_string())
}

fn print_text_results(rendered: &RenderedOutcome, verbose: bool) {
    if let Some(message) = &rendered.message {
        println!("{message}");
        return;
    }

    match rendered.pass {
        MatchPass::Relaxed => println!("No strict matches; showing relaxed matches."),
        MatchPass::NearMiss => println!("Decks one core card short of buildable:"),
        MatchPass::Strict | MatchPass::None => {}
    }

    for (i, m) in rendered.matches.iter().enumerate() {
        if i > 0 {
            println!("\n{}", "─".repeat(60));
        }

        println!("\n#{} {} ({}/4 core cards owned)", i + 1, m.tier, m.quad_owned_count);
        if !m.colors.is_empty() || !m.tags.is_empty() {
            println!("   Colors: {}  Tags: {}", m.colors.join(","), m.tags.join(","));
        }

        println!("\n   Core:");
        for card in &m.quad {
            println!("   {}", card_line(card));
        }
        println!("   Support:");
        for card in &m.support {
            println!("   {}", card_line(card));
        }

        if verbose {
            for card in m.quad.iter().chain(&m.support) {
                println!("   {} -> {}", card.id, card.image);
            }
        }
    }

    if rendered.total > rendered.matches.len() {
        println!(
            "\n... {} more matches (use --limit to show more)",
            rendered.total - rendered.matches.len()
        );
    }
    println!("\n* = not owned");
}

fn print_json_results(rendered: &RenderedOutcome, calculation: &Calculation) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "input_ids": calculation.input_ids,
        "skipped_solutions": calculation.skipped_solutions,
        "result": rendered,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize results")?
    );
    Ok(())
}

fn join_ids(cards: &[RenderedCard]) -> String {
    cards
        .iter()
        .map(|c| c.id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn unowned_ids(rendered: &[RenderedCard]) -> Vec<CardId> {
    rendered.iter().filter(|c| !c.owned).map(|c| c.id).collect()
}

fn print_tsv_results(rendered: &RenderedOutcome) {
    println!("rank\tpass\ttier\tquad_owned\tquad\tsupport\tmissing\tcolors\ttags");
    for (i, m) in rendered.matches.iter().enumerate() {
        let missing: Vec<String> = unowned_ids(&m.quad)
            .into_iter()
            .chain(unowned_ids(&m.support))
            .map(|id| id.to_string())
            .collect();
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            i + 1,
            rendered.pass,
            m.tier,
            m.quad_owned_count,
            join_ids(&m.quad),
            join_ids(&m.support),
            missing.join(","),
            m.colors.join(","),
            m.tags.join(","),
        );
    }
}
