use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::foundation::error::{CardError, CardResult};
use crate::theme::DEFAULT_BRAND;

/// File name prefix of card-set documents.
pub const DOCUMENT_PREFIX: &str = "card_data_";
/// File name suffix of card-set documents.
pub const DOCUMENT_SUFFIX: &str = ".json";

/// First card of a set: hero photo, headline and optional sub-text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TitleCard {
    /// Headline, may contain explicit line breaks.
    pub headline: String,
    /// Secondary text below the headline.
    pub sub_text: Option<String>,
}

/// Any card after the first: tag label, headline, divider and body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BodyCard {
    /// Short label drawn upper-cased over the photo.
    pub tag: String,
    /// Headline, may contain explicit line breaks.
    pub headline: String,
    /// Body text, may contain explicit line breaks.
    pub body: String,
}

/// A card, shaped by its position in the set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Card {
    /// Position 0.
    Title(TitleCard),
    /// Positions 1 and up.
    Body(BodyCard),
}

impl Card {
    /// Whether this card uses the title layout.
    pub fn is_title(&self) -> bool {
        matches!(self, Card::Title(_))
    }

    /// The variant this card renders as at 0-based `position`.
    ///
    /// Position 0 is always a title card and every later position a body card; fields that
    /// have no counterpart in the other variant are carried over where they fit.
    pub fn at_position(self, position: usize) -> Card {
        match (position, self) {
            (0, Card::Body(b)) => Card::Title(TitleCard {
                headline: b.headline,
                sub_text: None,
            }),
            (0, title) => title,
            (_, Card::Title(t)) => Card::Body(BodyCard {
                headline: t.headline,
                body: t.sub_text.unwrap_or_default(),
                ..BodyCard::default()
            }),
            (_, body) => body,
        }
    }

    fn from_def(position: usize, def: CardDef) -> Self {
        if position == 0 {
            Card::Title(TitleCard {
                headline: def.headline,
                sub_text: def.sub_text.filter(|s| !s.trim().is_empty()),
            })
        } else {
            Card::Body(BodyCard {
                tag: def.tag,
                headline: def.headline,
                body: def.body,
            })
        }
    }
}

/// Loose JSON shape shared by both card variants; the position decides which fields matter.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CardDef {
    headline: String,
    sub_text: Option<String>,
    tag: String,
    body: String,
}

#[derive(Debug, Deserialize)]
struct DocumentDef {
    #[serde(default = "default_brand")]
    brand: String,
    #[serde(default)]
    cards: Vec<CardDef>,
}

fn default_brand() -> String {
    DEFAULT_BRAND.to_owned()
}

/// One audience target's ordered card sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardSetDocument {
    /// Brand key used for theme, asset folders and output naming.
    pub brand: String,
    /// Cards in output order; the first is always [`Card::Title`].
    pub cards: Vec<Card>,
}

impl CardSetDocument {
    /// Build a document from cards given in order, classifying them by position.
    pub fn new(brand: impl Into<String>, cards: Vec<Card>) -> Self {
        let cards = cards
            .into_iter()
            .enumerate()
            .map(|(i, card)| card.at_position(i))
            .collect();
        Self {
            brand: brand.into(),
            cards,
        }
    }

    /// Parse a card-set document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CardResult<Self> {
        let def: DocumentDef = serde_json::from_reader(r)
            .map_err(|e| CardError::document(format!("parse card-set JSON: {e}")))?;
        let cards = def
            .cards
            .into_iter()
            .enumerate()
            .map(|(i, c)| Card::from_def(i, c))
            .collect();
        Ok(Self {
            brand: def.brand,
            cards,
        })
    }

    /// Parse a card-set document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CardResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CardError::document(format!("open card-set JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Number of images a full run produces (cards plus the splash).
    pub fn expected_outputs(&self) -> usize {
        self.cards.len() + 1
    }
}

/// Audience target encoded in a document file name (`card_data_student.json` → `student`).
pub fn target_from_path(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let target = name
        .strip_prefix(DOCUMENT_PREFIX)?
        .strip_suffix(DOCUMENT_SUFFIX)?;
    (!target.is_empty()).then(|| target.to_owned())
}

/// Card-set documents directly inside `dir`, sorted by file name.
pub fn discover_documents(dir: &Path) -> CardResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        CardError::document(format!("list documents in '{}': {e}", dir.display()))
    })?;
    let mut found: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && target_from_path(p).is_some())
        .collect();
    found.sort();
    Ok(found)
}

#[cfg(test)]
#[path = "../tests/unit/document.rs"]
mod tests;
