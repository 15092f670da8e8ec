//! Listing rules: limits and vocabularies injected into the validator.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use kindaebay_core::ChoiceSet;

/// Which label vocabulary listings are checked against.
///
/// Two vocabularies exist for the same field: a condition marker
/// (new/sold) and a display badge (primary/secondary/danger). Deployments
/// pick one; the default is `Condition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelVocabulary {
    #[default]
    Condition,
    Badge,
}

impl LabelVocabulary {
    pub fn choices(self) -> ChoiceSet {
        match self {
            LabelVocabulary::Condition => ChoiceSet::new([("N", "New"), ("S", "Sold")]),
            LabelVocabulary::Badge => ChoiceSet::new([
                ("primary", "Primary"),
                ("secondary", "Secondary"),
                ("danger", "Danger"),
            ]),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LabelVocabulary::Condition => "condition",
            LabelVocabulary::Badge => "badge",
        }
    }
}

impl FromStr for LabelVocabulary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "condition" => Ok(LabelVocabulary::Condition),
            "badge" => Ok(LabelVocabulary::Badge),
            other => Err(format!(
                "unknown label vocabulary '{other}' (expected 'condition' or 'badge')"
            )),
        }
    }
}

/// Immutable limits and vocabularies for product listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRules {
    pub title_max_chars: usize,
    pub max_digits: u32,
    pub decimal_places: u32,
    pub categories: ChoiceSet,
    pub labels: ChoiceSet,
    /// Lower-case file extensions accepted for the listing image.
    pub image_extensions: Vec<String>,
}

impl ListingRules {
    pub fn with_labels(vocabulary: LabelVocabulary) -> Self {
        Self {
            labels: vocabulary.choices(),
            ..Self::default()
        }
    }

    pub fn default_categories() -> ChoiceSet {
        ChoiceSet::new([
            ("HA", "House/Apartment"),
            ("C", "Car"),
            ("F", "Furniture"),
            ("E", "Electronics"),
            ("M", "Miscellaneous"),
        ])
    }
}

impl Default for ListingRules {
    fn default() -> Self {
        Self {
            title_max_chars: 120,
            max_digits: 10,
            decimal_places: 2,
            categories: Self::default_categories(),
            labels: LabelVocabulary::default().choices(),
            image_extensions: ["bmp", "gif", "jpeg", "jpg", "png", "tif", "tiff", "webp"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
