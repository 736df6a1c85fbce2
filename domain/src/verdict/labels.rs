//! Anonymous label assignment for blind judging.
//!
//! The judge only ever sees `Response A`, `Response B`, ... . Which provider
//! hides behind which label is decided by a seeded shuffle, so the mapping
//! is reproducible in tests and freshly random in production (fresh seed
//! per request).

use crate::core::provider_id::ProviderId;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

/// Label for the `index`-th position: A..Z, then AA, AB, ...
pub fn label_name(index: usize) -> String {
    let mut n = index;
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// A label → provider permutation for one evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelAssignment {
    entries: Vec<(String, ProviderId)>,
}

impl LabelAssignment {
    /// Labels in order (A, B, C, ...)
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(l, _)| l.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProviderId)> {
        self.entries.iter().map(|(l, p)| (l.as_str(), p))
    }

    pub fn provider_of(&self, label: &str) -> Option<&ProviderId> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, p)| p)
    }

    pub fn label_of(&self, provider_id: &ProviderId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, p)| p == provider_id)
            .map(|(l, _)| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<String, ProviderId> {
        self.entries.into_iter().collect()
    }
}

/// Assign anonymous labels to `provider_ids` using a permutation drawn from `seed`.
///
/// Pure: the same ids and seed always give the same mapping. Callers must
/// draw a new seed for every evaluation; reusing one reintroduces a fixed
/// label order.
///
/// # Examples
///
/// ```
/// use triplet_domain::{ProviderId, assign_labels};
///
/// let ids = ProviderId::default_set();
/// let labels = assign_labels(&ids, 42);
/// assert_eq!(labels.labels(), vec!["A", "B", "C"]);
/// assert!(ids.iter().all(|id| labels.label_of(id).is_some()));
/// ```
pub fn assign_labels(provider_ids: &[ProviderId], seed: u64) -> LabelAssignment {
    let mut shuffled = provider_ids.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    LabelAssignment {
        entries: shuffled
            .into_iter()
            .enumerate()
            .map(|(i, id)| (label_name(i), id))
            .collect(),
    }
}
