use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::store::CardCatalog;
use crate::core::id::denormalize;
use crate::core::types::{CardId, MatchPass, MatchTier, Rarity};
use crate::matching::engine::{MatchOutcome, MatchResult};
use crate::matching::ownership::OwnedSet;
use crate::render::caption::{image_path, split_title, DEFAULT_ICON_BASE};

/// Shown when no solution matches
pub const NO_RESULT_MESSAGE: &str =
    "No deck can be built from these cards yet. Try adding more SR/SSR cards.";

/// Border colour for unowned cards in strict results
pub const DEFAULT_HIGHLIGHT: &str = "pink";

/// Border colour for unowned cards in relaxed results
pub const DEFAULT_RELAXED_HIGHLIGHT: &str = "#88dae3";

/// Presentation options chosen by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub highlight: String,
    pub relaxed_highlight: String,
    /// Maximum number of matches to render; `None` renders all
    pub limit: Option<usize>,
    /// URL prefix for card icons
    pub icon_base: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            highlight: DEFAULT_HIGHLIGHT.to_string(),
            relaxed_highlight: DEFAULT_RELAXED_HIGHLIGHT.to_string(),
            limit: None,
            icon_base: DEFAULT_ICON_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedCard {
    /// Player-facing ID
    pub id: CardId,
    pub internal_id: CardId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    pub rarity: Rarity,
    pub image: String,
    pub owned: bool,
    /// Border colour when the card is not owned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedMatch {
    pub tier: MatchTier,
    pub quad_owned_count: usize,
    pub tags: Vec<String>,
    pub colors: Vec<String>,
    pub quad: Vec<RenderedCard>,
    pub support: Vec<RenderedCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedOutcome {
    pub pass: MatchPass,
    /// Usable owned cards, player-facing IDs
    pub owned: Vec<CardId>,
    /// Matches before the render limit was applied
    pub total: usize,
    pub matches: Vec<RenderedMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Resolve a card against the catalog. Cards missing from the catalog are
/// logged and left out rather than failing the whole result.
fn render_card(
    id: CardId,
    owned: &OwnedSet,
    catalog: &CardCatalog,
    highlight: &str,
    icon_base: &str,
) -> Option<RenderedCard> {
    let Some(card) = catalog.get(id) else {
        warn!("Card {id} (external {}) missing from catalog", denormalize(id));
        return None;
    };

    let caption = split_title(&card.title);
    let is_owned = owned.contains(id);

    Some(RenderedCard {
        id: card.external_id(),
        internal_id: id,
        title: caption.title,
        character: caption.character,
        rarity: card.rarity,
        image: image_path(icon_base, id),
        owned: is_owned,
        highlight: (!is_owned).then(|| highlight.to_string()),
    })
}

pub fn render_match(
    result: &MatchResult,
    owned: &OwnedSet,
    catalog: &CardCatalog,
    options: &RenderOptions,
) -> RenderedMatch {
    let highlight = if result.tier.is_relaxed() || result.tier.is_near_miss() {
        &options.relaxed_highlight
    } else {
        &options.highlight
    };
    let cards = |ids: &[CardId]| -> Vec<RenderedCard> {
        ids.iter()
            .filter_map(|&id| render_card(id, owned, catalog, highlight, &options.icon_base))
            .collect()
    };

    RenderedMatch {
        tier: result.tier,
        quad_owned_count: result.quad_owned_count,
        tags: result.solution.tags.clone(),
        colors: result.solution.colors.clone(),
        quad: cards(&result.solution.quad),
        support: cards(&result.used_support_ids),
    }
}

/// Render a whole calculation for display
pub fn render_outcome(
    outcome: &MatchOutcome,
    owned: &OwnedSet,
    catalog: &CardCatalog,
    options: &RenderOptions,
) -> RenderedOutcome {
    let limit = options.limit.unwrap_or(usize::MAX);
    let matches: Vec<RenderedMatch> = outcome
        .results
        .iter()
        .take(limit)
        .map(|m| render_match(m, owned, catalog, options))
        .collect();

    RenderedOutcome {
        pass: outcome.pass,
        owned: owned.external_ids(),
        total: outcome.len(),
        matches,
        message: outcome.is_empty().then(|| NO_RESULT_MESSAGE.to_string()),
    }
}
