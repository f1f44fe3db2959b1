use crate::core::card::Card;
use crate::core::id::denormalize;
use crate::core::types::CardId;

/// Published card icon directory
pub const DEFAULT_ICON_BASE: &str =
    "https://raw.githubusercontent.com/a1sareru/shoot300k/refs/heads/main/public/images/card_icons";

/// English name of a character, from the Japanese name used in card titles
#[must_use]
pub fn character_name_en(namae: &str) -> Option<&'static str> {
    let name = match namae {
        "オズ" => "Oz",
        "アーサー" => "Arthur",
        "カイン" => "Cain",
        "リケ" => "Riquet",
        "スノウ" => "Snow",
        "ホワイト" => "White",
        "ミスラ" => "Mithra",
        "オーエン" => "Owen",
        "ブラッドリー" => "Bradley",
        "ファウスト" => "Faust",
        "シノ" => "Shino",
        "ヒースクリフ" => "Heathcliff",
        "ネロ" => "Nero",
        "シャイロック" => "Shylock",
        "ムル" => "Murr",
        "クロエ" => "Chloe",
        "ラスティカ" => "Rustica",
        "フィガロ" => "Figaro",
        "ルチル" => "Rutile",
        "レノックス" => "Lennox",
        "ミチル" => "Mitile",
        _ => return None,
    };
    Some(name)
}

/// Display parts of a card title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardCaption {
    pub title: String,
    /// English character name when known, otherwise the name as written
    pub character: Option<String>,
}

/// Split a `【card title】character` title into its parts.
///
/// ```
/// use deck_solver::render::caption::split_title;
///
/// let caption = split_title("【月夜の約束】オズ");
/// assert_eq!(caption.title, "月夜の約束");
/// assert_eq!(caption.character.as_deref(), Some("Oz"));
/// ```
#[must_use]
pub fn split_title(raw: &str) -> CardCaption {
    let cleaned = raw.replace('【', "");
    let mut parts = cleaned.splitn(2, '】');
    let title = parts.next().unwrap_or_default().trim().to_string();
    let character = parts
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| character_name_en(name).map_or_else(|| name.to_string(), str::to_string));

    CardCaption { title, character }
}

/// Icon URL for a card under `base`, named by its external ID
#[must_use]
pub fn image_path(base: &str, internal: CardId) -> String {
    format!(
        "{}/Card_icon_{}.png",
        base.trim_end_matches('/'),
        denormalize(internal)
    )
}

/// One-line caption: `title / character | external id`
#[must_use]
pub fn format_caption(card: &Card) -> String {
    let caption = split_title(&card.title);
    match caption.character {
        Some(character) => format!("{} / {} | {}", caption.title, character, card.external_id()),
        None => format!("{} | {}", caption.title, card.external_id()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Rarity;

    #[test]
    fn test_split_title_unknown_character_kept() {
        let caption = split_title("【Gift】Someone");
        assert_eq!(caption.title, "Gift");
        assert_eq!(caption.character.as_deref(), Some("Someone"));
    }

    #[test]
    fn test_split_title_without_brackets() {
        let caption = split_title("Plain title");
        assert_eq!(caption.title, "Plain title");
        assert!(caption.character.is_none());
    }

    #[test]
    fn test_character_names() {
        assert_eq!(character_name_en("ミチル"), Some("Mitile"));
        assert_eq!(character_name_en("ブラッドリー"), Some("Bradley"));
        assert_eq!(character_name_en("unknown"), None);
    }

    #[test]
    fn test_image_path_uses_external_id() {
        assert_eq!(image_path("/card_icons", CardId(12)), "/card_icons/Card_icon_12.png");
        assert_eq!(image_path("/card_icons/", CardId(400)), "/card_icons/Card_icon_381.png");
        assert_eq!(
            image_path(DEFAULT_ICON_BASE, CardId(1)),
            format!("{DEFAULT_ICON_BASE}/Card_icon_1.png")
        );
    }

    #[test]
    fn test_format_caption() {
        let card = Card::new(400, Rarity::Ssr, "【月夜】ネロ");
        assert_eq!(format_caption(&card), "月夜 / Nero | 381");

        let card = Card::new(3, Rarity::Sr, "Untitled");
        assert_eq!(format_caption(&card), "Untitled | 3");
    }
}
