use crate::fuzzy;
use crate::index::{DocId, Document, Snapshot};
use crate::scorer::{self, QueryVector};
use crate::tokenizer::Tokenizer;
use crate::topk::TopK;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

/// Ranked results retained per query.
pub const TOP_K: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
}

/// Outcome of one query: ranked hits, or suggestions when nothing matched.
/// A query that normalizes to zero terms is a no-match with no suggestions.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum SearchOutcome {
    Success { results: Vec<SearchHit> },
    NoMatch { suggestions: Vec<String> },
}

/// Owner of the currently published corpus snapshot.
///
/// Queries clone the Arc out under a read lock and keep reading one
/// consistent snapshot for their whole lifetime; `rebuild` constructs the
/// replacement off to the side and publishes it with a single swap. No
/// other cross-request state exists, so queries need no further locking.
pub struct SearchEngine {
    tokenizer: Tokenizer,
    snapshot: RwLock<Arc<Snapshot>>,
}

impl SearchEngine {
    /// Starts with an empty snapshot; call `rebuild` to load a corpus.
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
        }
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }

    /// Build a complete snapshot from `corpus` and publish it atomically.
    /// Synchronous and potentially slow for the caller; concurrent searches
    /// keep reading the previously published snapshot until the swap.
    pub fn rebuild(&self, corpus: Vec<Document>) {
        let next = Snapshot::build(corpus, &self.tokenizer);
        tracing::info!(
            num_docs = next.total_docs(),
            num_terms = next.vocabulary.len(),
            "snapshot published"
        );
        *self.snapshot.write() = Arc::new(next);
    }

    /// Tokenize -> intersect postings -> rank candidates into the top K,
    /// or fall back to fuzzy suggestions when no candidate survives.
    pub fn search(&self, query: &str) -> SearchOutcome {
        let snapshot = self.snapshot();
        let terms = self.tokenizer.terms(query);
        if terms.is_empty() {
            return SearchOutcome::NoMatch { suggestions: Vec::new() };
        }

        let candidates = intersect_candidates(&snapshot, &terms);
        tracing::debug!(
            query,
            num_terms = terms.len(),
            num_candidates = candidates.len(),
            "query processed"
        );
        if candidates.is_empty() {
            // Fuzzy matching runs on the raw query string, not its terms.
            let suggestions = fuzzy::suggest(query, &snapshot.vocabulary);
            return SearchOutcome::NoMatch { suggestions };
        }

        let query_vector = QueryVector::from_terms(&terms);
        let scores = scorer::similarity_map(&snapshot, &query_vector);

        let mut selector = TopK::new(TOP_K);
        for doc_id in candidates {
            selector.push(doc_id, scores.get(&doc_id).copied().unwrap_or(0.0));
        }
        let results = selector
            .into_sorted()
            .into_iter()
            .map(|(doc_id, score)| SearchHit { doc_id, score })
            .collect();
        SearchOutcome::Success { results }
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Conjunctive candidate set: a left fold of sorted merges over the
/// query's known terms. Terms absent from the vocabulary are dropped from
/// the fold, so one unknown word narrows nothing instead of zeroing the
/// whole query; the first known term seeds the accumulator.
fn intersect_candidates(snapshot: &Snapshot, terms: &[String]) -> Vec<DocId> {
    let mut acc: Option<Vec<DocId>> = None;
    for term in terms {
        let list = match snapshot.postings.get(term) {
            Some(list) => list,
            None => continue,
        };
        acc = Some(match acc {
            None => list.clone(),
            Some(prev) => intersect(&prev, list),
        });
    }
    let mut candidates = acc.unwrap_or_default();
    // Occurrence-granular lists can repeat a doc id; lists stay ascending
    // through the merge, so adjacent dedup is enough.
    candidates.dedup();
    candidates
}

/// Two-pointer merge of two ascending posting lists.
fn intersect(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            out.push(a[i]);
            i += 1;
            j += 1;
        } else if a[i] > b[j] {
            j += 1;
        } else {
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;

    fn doc(id: DocId, text: &str) -> Document {
        Document { id, text: text.to_string() }
    }

    fn snapshot(docs: Vec<Document>) -> Snapshot {
        Snapshot::build(docs, &Tokenizer::new())
    }

    #[test]
    fn intersect_merges_sorted_lists() {
        assert_eq!(intersect(&[1, 3, 5, 7], &[2, 3, 6, 7]), vec![3, 7]);
        assert_eq!(intersect(&[1, 2], &[3, 4]), Vec::<DocId>::new());
        assert_eq!(intersect(&[], &[1]), Vec::<DocId>::new());
    }

    #[test]
    fn intersection_is_order_independent() {
        let snap = snapshot(vec![
            doc(1, "核酸 检测"),
            doc(2, "核酸 采样"),
            doc(3, "检测 安排 核酸"),
        ]);
        let ab = ["核酸".to_string(), "检测".to_string()];
        let ba = ["检测".to_string(), "核酸".to_string()];
        let mut left = intersect_candidates(&snap, &ab);
        let mut right = intersect_candidates(&snap, &ba);
        left.sort_unstable();
        right.sort_unstable();
        assert_eq!(left, right);
        assert_eq!(left, vec![1, 3]);
    }

    #[test]
    fn unknown_terms_are_dropped_from_the_fold() {
        let snap = snapshot(vec![doc(1, "核酸 检测"), doc(2, "采样")]);
        // Unknown first, known second: the known term must still seed the
        // accumulator rather than intersecting against nothing.
        let terms = ["不存在的词".to_string(), "核酸".to_string()];
        assert_eq!(intersect_candidates(&snap, &terms), vec![1]);
    }

    #[test]
    fn all_unknown_terms_yield_no_candidates() {
        let snap = snapshot(vec![doc(1, "核酸")]);
        let terms = ["乌有".to_string()];
        assert!(intersect_candidates(&snap, &terms).is_empty());
    }

    #[test]
    fn repeated_occurrences_do_not_duplicate_candidates() {
        let snap = snapshot(vec![doc(1, "核酸 核酸 核酸")]);
        let terms = ["核酸".to_string()];
        assert_eq!(intersect_candidates(&snap, &terms), vec![1]);
    }
}
