//! Stream label parsing and the classification rules built on it.
//!
//! Two independent readings of a stream label exist:
//! - `StreamLabel` splits on `" in "` and recognizes only exact shapes.
//! - `CategoryMentions` records which category names occur anywhere in the
//!   text. The containment rules behind the misclassified-weight report use
//!   this looser reading.

use crate::constants::category::MISCLASSIFICATION_SEPARATOR;
use crate::data::Category;

/// Typed reading of a stream label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamLabel {
    /// Pure category label: material sorted into its own bin.
    Correct(Category),
    /// `"<actual> in <placed_in>"` with two distinct categories.
    Misclassified {
        /// Material the waste actually is.
        actual: Category,
        /// Bin it was found in.
        placed_in: Category,
    },
    /// Any other shape. Counted in raw totals only.
    Unrecognized,
}

impl StreamLabel {
    /// Parse a raw stream label. Never fails; unknown shapes map to `Unrecognized`.
    pub fn parse(stream: &str) -> Self {
        if let Some(category) = Category::from_correct_label(stream) {
            return StreamLabel::Correct(category);
        }
        let mut parts = stream.split(MISCLASSIFICATION_SEPARATOR);
        let (Some(actual), Some(placed_in), None) = (parts.next(), parts.next(), parts.next())
        else {
            return StreamLabel::Unrecognized;
        };
        match (Category::from_name(actual), Category::from_name(placed_in)) {
            (Some(actual), Some(placed_in)) if actual != placed_in => {
                StreamLabel::Misclassified { actual, placed_in }
            }
            _ => StreamLabel::Unrecognized,
        }
    }

    /// True for pure category labels.
    pub fn is_correct(&self) -> bool {
        matches!(self, StreamLabel::Correct(_))
    }
}

/// Set of category names found by substring search in a stream label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryMentions {
    bits: u8,
}

impl CategoryMentions {
    /// Record every canonical category name contained in `text`.
    pub fn scan(text: &str) -> Self {
        let mut mentions = Self::default();
        for category in Category::ALL {
            if text.contains(category.as_str()) {
                mentions.bits |= 1 << category.index();
            }
        }
        mentions
    }

    /// Whether `category` is mentioned.
    pub fn contains(self, category: Category) -> bool {
        self.bits & (1 << category.index()) != 0
    }

    /// Number of distinct categories mentioned.
    pub fn len(self) -> u32 {
        self.bits.count_ones()
    }

    /// True when no category name is mentioned.
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }
}

/// Bucket that receives a record's weight in the misclassified-weight reports.
///
/// Rules, in evaluation order:
/// 1. `Landfill` together with any other category name goes to `Landfill`.
/// 2. `Recycling` together with `Compost` is left unattributed. Recycling is
///    never credited as the misplaced material here, only in the
///    `" in "`-split report.
/// 3. `Compost` together with another name would go to `Compost`; with rules
///    1 and 2 ahead of it, that combination is already decided.
///
/// Labels naming fewer than two categories are not misclassifications.
pub fn containment_attribution(mentions: CategoryMentions) -> Option<Category> {
    let landfill = mentions.contains(Category::Landfill);
    let recycling = mentions.contains(Category::Recycling);
    let compost = mentions.contains(Category::Compost);
    match (landfill, recycling, compost) {
        (true, true, _) | (true, _, true) => Some(Category::Landfill),
        // Recycling with Compost also names Compost, but the Recycling
        // check runs first and only credits Landfill.
        (false, true, true) => None,
        _ => None,
    }
}

/// True when `substream` names a category other than `category`.
///
/// A pure stream whose substream mentions another bin is treated as a nested
/// misclassification and left out of correct totals.
pub fn substream_conflicts(category: Category, substream: &str) -> bool {
    category
        .others()
        .iter()
        .any(|other| substream.contains(other.as_str()))
}

/// Category a record counts toward in correct-classification totals, if any.
pub fn correct_category(label: StreamLabel, substream: &str) -> Option<Category> {
    match label {
        StreamLabel::Correct(category) if !substream_conflicts(category, substream) => {
            Some(category)
        }
        _ => None,
    }
}
