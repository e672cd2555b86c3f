use crate::scorer;
use crate::tokenizer::Tokenizer;
use std::collections::{HashMap, HashSet};

pub type DocId = u32;

/// A raw corpus entry. Ids are assigned by the corpus provider in ingestion
/// order starting at 1 and never change within a snapshot.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocId,
    pub text: String,
}

/// One fully built, immutable view of the corpus. A rebuild constructs a
/// new snapshot off to the side and publishes it whole; readers never see
/// partially built state.
#[derive(Default)]
pub struct Snapshot {
    pub docs: Vec<Document>,
    /// term -> doc ids, one entry per occurrence (not deduplicated).
    /// Ascending, which the query-side merge intersection relies on.
    pub postings: HashMap<String, Vec<DocId>>,
    pub vocabulary: HashSet<String>,
    /// doc id -> its term sequence, in order, with repetition.
    pub doc_terms: HashMap<DocId, Vec<String>>,
    /// doc id -> sparse tf-idf weights over the terms present in that doc.
    pub doc_weights: HashMap<DocId, HashMap<String, f64>>,
}

impl Snapshot {
    /// Single pass over the corpus in ascending id order. The whole corpus
    /// is always rebuilt together; there is no per-document re-indexing.
    pub fn build(corpus: Vec<Document>, tokenizer: &Tokenizer) -> Self {
        let mut postings: HashMap<String, Vec<DocId>> = HashMap::new();
        let mut vocabulary: HashSet<String> = HashSet::new();
        let mut doc_terms: HashMap<DocId, Vec<String>> = HashMap::new();

        for doc in &corpus {
            let terms = tokenizer.terms(&doc.text);
            for term in &terms {
                postings.entry(term.clone()).or_default().push(doc.id);
                vocabulary.insert(term.clone());
            }
            doc_terms.insert(doc.id, terms);
        }

        let doc_weights = scorer::document_weights(corpus.len(), &postings, &doc_terms);
        Snapshot { docs: corpus, postings, vocabulary, doc_terms, doc_weights }
    }

    pub fn total_docs(&self) -> usize {
        self.docs.len()
    }

    /// Ids are dense and 1-based, so lookup is positional.
    pub fn document(&self, id: DocId) -> Option<&Document> {
        self.docs.get(id.checked_sub(1)? as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: DocId, text: &str) -> Document {
        Document { id, text: text.to_string() }
    }

    #[test]
    fn posting_lists_are_ascending_with_repetition() {
        let tok = Tokenizer::new();
        let snap = Snapshot::build(
            vec![doc(1, "核酸 核酸 检测"), doc(2, "核酸 采样")],
            &tok,
        );
        let list = snap.postings.get("核酸").unwrap();
        assert_eq!(list, &vec![1, 1, 2]);
        assert!(snap.vocabulary.contains("检测"));
        assert_eq!(snap.doc_terms.get(&1).unwrap().len(), 3);
    }

    #[test]
    fn empty_corpus_builds_empty_structures() {
        let tok = Tokenizer::new();
        let snap = Snapshot::build(Vec::new(), &tok);
        assert_eq!(snap.total_docs(), 0);
        assert!(snap.postings.is_empty());
        assert!(snap.vocabulary.is_empty());
    }

    #[test]
    fn document_lookup_is_one_based() {
        let tok = Tokenizer::new();
        let snap = Snapshot::build(vec![doc(1, "first"), doc(2, "second")], &tok);
        assert_eq!(snap.document(1).unwrap().id, 1);
        assert_eq!(snap.document(2).unwrap().id, 2);
        assert!(snap.document(0).is_none());
        assert!(snap.document(3).is_none());
    }
}
