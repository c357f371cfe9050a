use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Selected option per derived-question position.
///
/// The first answer recorded for a position is final for the attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap {
    selections: BTreeMap<usize, usize>,
}

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `option` for `position` unless that position was already answered.
    ///
    /// Returns `true` when the answer was stored.
    pub fn record(&mut self, position: usize, option: usize) -> bool {
        if self.selections.contains_key(&position) {
            return false;
        }
        self.selections.insert(position, option);
        true
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<usize> {
        self.selections.get(&position).copied()
    }

    #[must_use]
    pub fn is_answered(&self, position: usize) -> bool {
        self.selections.contains_key(&position)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Answers in position order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.selections.iter().map(|(pos, opt)| (*pos, *opt))
    }
}

impl FromIterator<(usize, usize)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (position, option) in iter {
            map.record(position, option);
        }
        map
    }
}
