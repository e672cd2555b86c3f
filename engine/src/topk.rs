use crate::index::DocId;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Bounded selector retaining the K best-scoring candidates from a stream.
///
/// Internally a min-heap over score: under capacity every candidate is
/// pushed; at capacity a candidate enters only by strictly beating the
/// current minimum, which it evicts. The worst retained entry always sits
/// at the root, so the true top K survive without sorting the full stream.
pub struct TopK {
    heap: BinaryHeap<Reverse<(OrderedFloat<f64>, DocId)>>,
    k: usize,
}

impl TopK {
    pub fn new(k: usize) -> Self {
        Self { heap: BinaryHeap::with_capacity(k + 1), k }
    }

    pub fn push(&mut self, doc_id: DocId, score: f64) {
        if self.k == 0 {
            return;
        }
        if self.heap.len() < self.k {
            self.heap.push(Reverse((OrderedFloat(score), doc_id)));
            return;
        }
        if let Some(&Reverse((min_score, _))) = self.heap.peek() {
            if OrderedFloat(score) > min_score {
                self.heap.pop();
                self.heap.push(Reverse((OrderedFloat(score), doc_id)));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Retained entries, best score first; equal scores order by ascending
    /// doc id.
    pub fn into_sorted(self) -> Vec<(DocId, f64)> {
        let mut entries: Vec<(DocId, f64)> = self
            .heap
            .into_iter()
            .map(|Reverse((score, doc_id))| (doc_id, score.0))
            .collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_returns_more_than_k() {
        let mut topk = TopK::new(3);
        for id in 1..=10 {
            topk.push(id, id as f64);
        }
        assert_eq!(topk.len(), 3);
    }

    #[test]
    fn retains_the_true_top_k() {
        // Interleaved order so the selector must evict mid-stream.
        let scores = [0.2, 0.9, 0.1, 0.8, 0.5, 0.7, 0.3];
        let mut topk = TopK::new(3);
        for (i, &s) in scores.iter().enumerate() {
            topk.push(i as DocId + 1, s);
        }
        let got: Vec<f64> = topk.into_sorted().iter().map(|&(_, s)| s).collect();
        assert_eq!(got, vec![0.9, 0.8, 0.7]);
    }

    #[test]
    fn output_is_descending_with_ascending_id_ties() {
        let mut topk = TopK::new(4);
        topk.push(7, 0.5);
        topk.push(2, 0.5);
        topk.push(9, 0.9);
        topk.push(4, 0.5);
        let got = topk.into_sorted();
        assert_eq!(got[0], (9, 0.9));
        let tied_ids: Vec<DocId> = got[1..].iter().map(|&(id, _)| id).collect();
        assert_eq!(tied_ids, vec![2, 4, 7]);
    }

    #[test]
    fn equal_score_does_not_evict_at_capacity() {
        let mut topk = TopK::new(2);
        topk.push(1, 0.4);
        topk.push(2, 0.6);
        topk.push(3, 0.4);
        let ids: Vec<DocId> = topk.into_sorted().iter().map(|&(id, _)| id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn under_capacity_keeps_everything() {
        let mut topk = TopK::new(10);
        topk.push(1, 0.0);
        topk.push(2, -1.0);
        assert_eq!(topk.len(), 2);
    }
}
