//! Moving text from one document into the slots of another.
//!
//! The target keeps every part it already has; only the text of the paired
//! slots changes, so a migrated template emits with its styles, media and
//! layouts untouched.

use crate::ooxml::error::{DocumentError, Result};
use crate::ooxml::session::editor::Session;
use crate::ooxml::text::{self, Flavor};
use serde::{Deserialize, Serialize};

/// How source slots are paired with target slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotMapping {
    /// Slot `i` of the source fills slot `i` of the target; the slot counts
    /// must be equal.
    ByIndex,
    /// Slides are paired by position and, on each pair, slot `i` fills slot
    /// `i`. Slides present on one side only are skipped; paired slides must
    /// hold the same number of slots. Word-processing documents behave as a
    /// single slide.
    BySlidePosition,
    /// Explicit `(source, target)` slot index pairs. Target slots not named
    /// keep their text.
    Pairs(Vec<(usize, usize)>),
}

impl Session {
    /// Copy text from `source` into this session's slots.
    ///
    /// Every pair is resolved and every text checked before the first write,
    /// so a failing migration leaves the session unchanged. Returns the number
    /// of slots whose text changed.
    ///
    /// # Errors
    /// [`DocumentError::FlavorMismatch`] when the documents differ in flavor,
    /// [`DocumentError::SlotCountMismatch`] when the mapping's count check
    /// fails and [`DocumentError::SlotNotFound`] for an explicit pair naming a
    /// slot that does not exist.
    pub fn migrate_from(&mut self, source: &Session, mapping: &SlotMapping) -> Result<usize> {
        if source.flavor() != self.flavor() {
            return Err(DocumentError::FlavorMismatch {
                expected: self.flavor(),
                actual: source.flavor(),
            });
        }

        let pairs = match mapping {
            SlotMapping::ByIndex => {
                if source.slot_count() != self.slot_count() {
                    return Err(DocumentError::SlotCountMismatch {
                        expected: self.slot_count(),
                        actual: source.slot_count(),
                    });
                }
                (0..self.slot_count()).map(|i| (i, i)).collect()
            },
            SlotMapping::BySlidePosition => slide_pairs(&source.slide_groups(), &self.slide_groups())?,
            SlotMapping::Pairs(pairs) => pairs.clone(),
        };

        let mut writes = Vec::with_capacity(pairs.len());
        for (from, to) in pairs {
            let text = source.read_text(from)?;
            let slot = self.slots().get(to).ok_or_else(|| DocumentError::SlotNotFound {
                part: String::new(),
                index: to,
            })?;
            text::check_text(slot, text)?;
            writes.push((to, text));
        }

        let paired = writes.len();
        let mut changed = 0;
        for (to, text) in writes {
            if self.write_text(to, text)? {
                changed += 1;
            }
        }
        log::debug!("migrated {} paired slots, {} changed", paired, changed);
        Ok(changed)
    }

    /// Slot counts per slide; a word-processing document is one group.
    fn slide_groups(&self) -> Vec<usize> {
        match self.flavor() {
            Flavor::Presentation => self.slots_per_slide(),
            Flavor::WordProcessing => vec![self.slot_count()],
        }
    }
}

/// Pair slots slide by slide over the slides both documents have.
fn slide_pairs(source: &[usize], target: &[usize]) -> Result<Vec<(usize, usize)>> {
    let mut pairs = Vec::new();
    let (mut source_offset, mut target_offset) = (0, 0);

    for (&from_count, &to_count) in source.iter().zip(target) {
        if from_count != to_count {
            return Err(DocumentError::SlotCountMismatch {
                expected: to_count,
                actual: from_count,
            });
        }
        pairs.extend((0..to_count).map(|i| (source_offset + i, target_offset + i)));
        source_offset += from_count;
        target_offset += to_count;
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(text: &str) -> Session {
        Session::blank(Flavor::Presentation, text).unwrap()
    }

    #[test]
    fn test_by_index() {
        let source = Session::blank(Flavor::WordProcessing, "New title\n\nNew body").unwrap();
        let mut target = Session::blank(Flavor::WordProcessing, "Title\n\nBody").unwrap();

        assert_eq!(target.migrate_from(&source, &SlotMapping::ByIndex).unwrap(), 2);
        assert_eq!(target.extract_plain_text(), "New title\n\nNew body");
    }

    #[test]
    fn test_by_index_count_check() {
        let source = Session::blank(Flavor::WordProcessing, "only").unwrap();
        let mut target = Session::blank(Flavor::WordProcessing, "Title\n\nBody").unwrap();

        assert!(matches!(
            target.migrate_from(&source, &SlotMapping::ByIndex),
            Err(DocumentError::SlotCountMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert_eq!(target.extract_plain_text(), "Title\n\nBody");
    }

    #[test]
    fn test_by_slide_position_skips_unpaired_slides() {
        let source = deck("Slide 1:\nA\nB\n\nSlide 2:\nC\n\nSlide 3:\nD");
        let mut target = deck("Slide 1:\nx\ny\n\nSlide 2:\nz");

        assert_eq!(target.migrate_from(&source, &SlotMapping::BySlidePosition).unwrap(), 3);
        assert_eq!(target.extract_plain_text(), "Slide 1:\nA\nB\n\nSlide 2:\nC");
    }

    #[test]
    fn test_by_slide_position_count_check() {
        let source = deck("Slide 1:\nA\n\nSlide 2:\nB\nC");
        let mut target = deck("Slide 1:\nx\n\nSlide 2:\nz");

        assert!(matches!(
            target.migrate_from(&source, &SlotMapping::BySlidePosition),
            Err(DocumentError::SlotCountMismatch {
                expected: 1,
                actual: 2
            })
        ));
        assert_eq!(target.read_text(0).unwrap(), "x");
    }

    #[test]
    fn test_explicit_pairs() {
        let source = deck("Slide 1:\nQ3 results\nRevenue up");
        let mut target = deck("Slide 1:\nTitle\n\nSlide 2:\nSummary");

        let mapping = SlotMapping::Pairs(vec![(0, 0), (1, 1)]);
        assert_eq!(target.migrate_from(&source, &mapping).unwrap(), 2);
        assert_eq!(target.extract_plain_text(), "Slide 1:\nQ3 results\n\nSlide 2:\nRevenue up");

        let bad = SlotMapping::Pairs(vec![(0, 0), (1, 9)]);
        assert!(matches!(
            target.migrate_from(&source, &bad),
            Err(DocumentError::SlotNotFound { index: 9, .. })
        ));
    }

    #[test]
    fn test_flavor_mismatch() {
        let source = deck("Slide 1:\nA");
        let mut target = Session::blank(Flavor::WordProcessing, "A").unwrap();
        assert!(matches!(
            target.migrate_from(&source, &SlotMapping::ByIndex),
            Err(DocumentError::FlavorMismatch {
                expected: Flavor::WordProcessing,
                actual: Flavor::Presentation
            })
        ));
    }

    #[test]
    fn test_mapping_from_yaml() {
        let mapping: SlotMapping = serde_saphyr::from_str("pairs:\n  - [0, 1]\n  - [2, 0]\n").unwrap();
        assert_eq!(mapping, SlotMapping::Pairs(vec![(0, 1), (2, 0)]));
    }
}
