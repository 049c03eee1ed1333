//! Typo-tolerant weighted multi-field matching over an in-memory collection.
//!
//! Each key is scored by the best approximate substring match of the pattern
//! (edit distance divided by pattern length, 0 = exact). Matching keys are
//! combined as a weighted product so that an item matching several keys, or
//! a heavily weighted key, ranks first.

/// Accessor for one searchable field of `T`.
pub type KeyGetter<T> = fn(&T) -> Option<&str>;

/// A searchable field and its relative weight.
pub struct WeightedKey<T> {
    pub name: &'static str,
    pub weight: f64,
    pub get: KeyGetter<T>,
}

/// A matched item with its combined score (lower is better).
#[derive(Debug)]
pub struct FuzzyMatch<'a, T> {
    pub item: &'a T,
    /// Position of the item in the indexed collection.
    pub index: usize,
    pub score: f64,
}

/// Lowercased character buffers for every item and key, built once per
/// collection.
pub struct FuzzyIndex<'a, T> {
    items: &'a [T],
    names: Vec<&'static str>,
    weights: Vec<f64>,
    fields: Vec<Vec<Option<Vec<char>>>>,
    threshold: f64,
}

impl<'a, T> FuzzyIndex<'a, T> {
    /// Index `items` on `keys`. Weights are normalized to sum to 1.
    ///
    /// `threshold` is the highest per-key distance (0..=1) still counted as
    /// a match.
    pub fn new(items: &'a [T], keys: &[WeightedKey<T>], threshold: f64) -> Self {
        let total: f64 = keys.iter().map(|k| k.weight.max(0.0)).sum();
        let weights = keys
            .iter()
            .map(|k| {
                if total > 0.0 {
                    k.weight.max(0.0) / total
                } else {
                    1.0 / keys.len() as f64
                }
            })
            .collect();

        let names = keys.iter().map(|k| k.name).collect();

        let fields = items
            .iter()
            .map(|item| {
                keys.iter()
                    .map(|key| {
                        (key.get)(item)
                            .filter(|value| !value.trim().is_empty())
                            .map(|value| value.to_lowercase().chars().collect())
                    })
                    .collect()
            })
            .collect();

        Self {
            items,
            names,
            weights,
            fields,
            threshold,
        }
    }

    /// Return at most `limit` matches ordered by ascending score.
    ///
    /// Ties keep collection order.
    pub fn search(&self, pattern: &str, limit: usize) -> Vec<FuzzyMatch<'a, T>> {
        let pattern: Vec<char> = pattern.trim().to_lowercase().chars().collect();
        if pattern.is_empty() || limit == 0 {
            return Vec::new();
        }
        let max_errors = (self.threshold * pattern.len() as f64 + 1e-9).floor() as usize;

        let mut matches: Vec<FuzzyMatch<'a, T>> = self
            .fields
            .iter()
            .enumerate()
            .filter_map(|(index, fields)| {
                self.score_item(&pattern, fields, max_errors)
                    .map(|score| FuzzyMatch {
                        item: &self.items[index],
                        index,
                        score,
                    })
            })
            .collect();

        matches.sort_by(|a, b| a.score.total_cmp(&b.score));
        matches.truncate(limit);
        matches
    }

    fn score_item(
        &self,
        pattern: &[char],
        fields: &[Option<Vec<char>>],
        max_errors: usize,
    ) -> Option<f64> {
        let mut total = 1.0;
        let mut matched = false;

        for ((name, weight), field) in self.names.iter().zip(&self.weights).zip(fields) {
            let Some(text) = field else { continue };
            let distance = substring_distance(pattern, text);
            if distance > max_errors {
                continue;
            }
            tracing::trace!(key = *name, distance, "key matched");
            let score = distance as f64 / pattern.len() as f64;
            total *= score.max(f64::EPSILON).powf(*weight);
            matched = true;
        }

        matched.then_some(total)
    }
}

/// Smallest edit distance between `pattern` and any substring of `text`.
pub fn substring_distance(pattern: &[char], text: &[char]) -> usize {
    let m = pattern.len();
    if m == 0 {
        return 0;
    }

    // column[i]: cost of matching pattern[..i] ending at the current text position
    let mut column: Vec<usize> = (0..=m).collect();
    let mut best = m;

    for &t in text {
        let mut diagonal = column[0];
        for i in 1..=m {
            let above = column[i];
            let cost = usize::from(pattern[i - 1] != t);
            column[i] = (diagonal + cost).min(above + 1).min(column[i - 1] + 1);
            diagonal = above;
        }
        best = best.min(column[m]);
        if best == 0 {
            break;
        }
    }

    best
}
