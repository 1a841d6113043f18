//! In-memory snapshot of a loaded report.
//!
//! One snapshot per load: sentences keyed by id, plus the first and last
//! loaded sentence ids for range navigation. A reload replaces the snapshot
//! wholesale; there is no incremental update or eviction.

use std::collections::HashMap;

use crate::schemas::{Mapping, Sentence};

#[derive(Debug, Default)]
pub struct ReportSnapshot {
    sentences: HashMap<i64, Sentence>,
    first_sentence_id: Option<i64>,
    last_sentence_id: Option<i64>,
    /// Ids in payload order; also drives the deterministic iteration below.
    order: Vec<i64>,
}

impl ReportSnapshot {
    /// Build a snapshot from one sentence payload. Duplicate ids keep the
    /// last occurrence, dict-assignment style; first/last ids follow payload
    /// positions 0 and N-1.
    pub fn from_sentences(sentences: Vec<Sentence>) -> Self {
        let mut map = HashMap::with_capacity(sentences.len());
        let mut order = Vec::with_capacity(sentences.len());
        let first_sentence_id = sentences.first().map(|s| s.id);
        let last_sentence_id = sentences.last().map(|s| s.id);
        for sentence in sentences {
            if !map.contains_key(&sentence.id) {
                order.push(sentence.id);
            }
            map.insert(sentence.id, sentence);
        }
        Self {
            sentences: map,
            first_sentence_id,
            last_sentence_id,
            order,
        }
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Sentence> {
        self.sentences.get(&id)
    }

    pub fn first_sentence_id(&self) -> Option<i64> {
        self.first_sentence_id
    }

    pub fn last_sentence_id(&self) -> Option<i64> {
        self.last_sentence_id
    }

    /// All `(sentence id, mappings)` pairs in load order.
    pub fn mappings(&self) -> impl Iterator<Item = (i64, &[Mapping])> {
        self.order.iter().filter_map(|id| {
            self.sentences
                .get(id)
                .map(|s| (s.id, s.mappings.as_slice()))
        })
    }

    /// Mappings of the first loaded sentence only.
    ///
    /// Compatibility accessor: the original extractor returned inside its
    /// first loop iteration instead of aggregating, so existing callers see
    /// one sentence's mappings. New code should use [`mappings`].
    ///
    /// [`mappings`]: ReportSnapshot::mappings
    pub fn first_sentence_mappings(&self) -> &[Mapping] {
        self.first_sentence_id
            .and_then(|id| self.sentences.get(&id))
            .map(|s| s.mappings.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(id: i64, mappings: Vec<Mapping>) -> Sentence {
        Sentence {
            id,
            text: format!("sentence {}", id),
            disposition: None,
            mappings,
        }
    }

    fn mapping(attack_id: &str) -> Mapping {
        Mapping {
            id: None,
            attack_id: Some(attack_id.to_string()),
            name: None,
            confidence: None,
        }
    }

    #[test]
    fn test_snapshot_keys_match_payload() {
        let snapshot = ReportSnapshot::from_sentences(vec![
            sentence(4, vec![]),
            sentence(9, vec![]),
            sentence(2, vec![]),
        ]);
        assert_eq!(snapshot.len(), 3);
        for id in [4, 9, 2] {
            assert!(snapshot.get(id).is_some());
        }
        assert_eq!(snapshot.first_sentence_id(), Some(4));
        assert_eq!(snapshot.last_sentence_id(), Some(2));
    }

    #[test]
    fn test_duplicate_ids_last_wins() {
        let mut dup = sentence(1, vec![mapping("T1003")]);
        dup.text = "second occurrence".to_string();
        let snapshot =
            ReportSnapshot::from_sentences(vec![sentence(1, vec![]), dup, sentence(2, vec![])]);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(1).unwrap().text, "second occurrence");
    }

    #[test]
    fn test_single_sentence_first_equals_last() {
        let snapshot = ReportSnapshot::from_sentences(vec![sentence(7, vec![])]);
        assert_eq!(snapshot.first_sentence_id(), Some(7));
        assert_eq!(snapshot.last_sentence_id(), Some(7));
    }

    #[test]
    fn test_mappings_iterates_all_sentences() {
        let snapshot = ReportSnapshot::from_sentences(vec![
            sentence(1, vec![]),
            sentence(2, vec![mapping("T1059")]),
        ]);
        let pairs: Vec<(i64, usize)> = snapshot.mappings().map(|(id, m)| (id, m.len())).collect();
        assert_eq!(pairs, vec![(1, 0), (2, 1)]);
    }

    #[test]
    fn test_first_sentence_mappings_short_circuit() {
        // The historical extractor returns the first sentence's (empty)
        // mapping list, not the populated one further in.
        let snapshot = ReportSnapshot::from_sentences(vec![
            sentence(1, vec![]),
            sentence(2, vec![mapping("T1566")]),
        ]);
        assert!(snapshot.first_sentence_mappings().is_empty());
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = ReportSnapshot::from_sentences(vec![]);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.first_sentence_id(), None);
        assert!(snapshot.first_sentence_mappings().is_empty());
    }
}
