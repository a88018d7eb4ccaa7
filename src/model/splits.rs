//! Split systems: weighted bipartitions of the taxon set.
//!
//! A split is stored as the [TaxaSet] of one of its two sides; the other side
//! is the complement with respect to `1..=ntax`.

use std::fmt;

const WORD_BITS: usize = 64;

// =#========================================================================#=
// TAXA SET
// =#========================================================================$=
/// Bit set over 1-based taxon indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TaxaSet {
    words: Vec<u64>,
}

impl TaxaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds taxon `t` (1-based).
    pub fn insert(&mut self, t: usize) {
        let (word, bit) = (t / WORD_BITS, t % WORD_BITS);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << bit;
    }

    pub fn contains(&self, t: usize) -> bool {
        self.words
            .get(t / WORD_BITS)
            .is_some_and(|w| w & (1u64 << (t % WORD_BITS)) != 0)
    }

    /// Number of taxa in the set.
    pub fn cardinality(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Taxa in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, word)| {
            (0..WORD_BITS)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| i * WORD_BITS + bit)
        })
    }

    /// Complement with respect to `1..=ntax`.
    pub fn complement(&self, ntax: usize) -> TaxaSet {
        (1..=ntax).filter(|t| !self.contains(*t)).collect()
    }

    /// Whether the set contains exactly the taxa `1..=ntax`.
    pub fn is_full(&self, ntax: usize) -> bool {
        self.cardinality() == ntax && (1..=ntax).all(|t| self.contains(t))
    }
}

impl FromIterator<usize> for TaxaSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = TaxaSet::new();
        for t in iter {
            set.insert(t);
        }
        set
    }
}

impl fmt::Display for TaxaSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for t in self.iter() {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{t}")?;
            first = false;
        }
        Ok(())
    }
}

/// A single split.
#[derive(Debug, Clone, PartialEq)]
pub struct ASplit {
    /// One side of the bipartition
    pub taxa: TaxaSet,
    pub weight: f64,
    pub confidence: Option<f64>,
    pub label: Option<String>,
}

impl ASplit {
    pub fn new(taxa: TaxaSet, weight: f64) -> Self {
        Self {
            taxa,
            weight,
            confidence: None,
            label: None,
        }
    }

    /// Whether this split is trivial for `ntax` taxa (one side empty).
    pub fn is_trivial(&self, ntax: usize) -> bool {
        self.taxa.is_empty() || self.taxa.is_full(ntax)
    }
}

/// Compatibility class of a split system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compatibility {
    Compatible,
    Cyclic,
    WeaklyCompatible,
    #[default]
    Incompatible,
}

impl Compatibility {
    /// Keyword(s) used in PROPERTIES.
    pub fn name(&self) -> &'static str {
        match self {
            Compatibility::Compatible => "compatible",
            Compatibility::Cyclic => "cyclic",
            Compatibility::WeaklyCompatible => "weakly compatible",
            Compatibility::Incompatible => "incompatible",
        }
    }
}

/// Which optional columns the MATRIX rows carry.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitsFormat {
    pub labels: bool,
    pub weights: bool,
    pub confidences: bool,
}

impl Default for SplitsFormat {
    fn default() -> Self {
        Self {
            labels: false,
            weights: true,
            confidences: false,
        }
    }
}

impl SplitsFormat {
    pub fn with_labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_weights(mut self, weights: bool) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_confidences(mut self, confidences: bool) -> Self {
        self.confidences = confidences;
        self
    }
}

// =#========================================================================#=
// SPLITS BLOCK
// =#========================================================================$=
/// Ordered list of non-trivial splits over `ntax` taxa.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitsBlock {
    ntax: usize,
    splits: Vec<ASplit>,
    /// Circular ordering, a permutation of `1..=ntax`
    cycle: Option<Vec<usize>>,
    fit: Option<f64>,
    threshold: Option<f64>,
    compatibility: Compatibility,
    format: SplitsFormat,
}

impl SplitsBlock {
    pub fn new(ntax: usize) -> Self {
        Self {
            ntax,
            splits: Vec::new(),
            cycle: None,
            fit: None,
            threshold: None,
            compatibility: Compatibility::default(),
            format: SplitsFormat::default(),
        }
    }

    pub fn with_format(mut self, format: SplitsFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_compatibility(mut self, compatibility: Compatibility) -> Self {
        self.compatibility = compatibility;
        self
    }

    pub fn with_fit(mut self, fit: Option<f64>) -> Self {
        self.fit = fit;
        self
    }

    pub fn with_threshold(mut self, threshold: Option<f64>) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the cycle; ignored unless it is a permutation of `1..=ntax`.
    pub fn with_cycle(mut self, cycle: Vec<usize>) -> Self {
        if is_permutation(&cycle, self.ntax) {
            self.cycle = Some(cycle);
        }
        self
    }

    /// Appends a split.
    ///
    /// # Returns
    /// `false` (and drops the split) if it is trivial.
    pub fn push(&mut self, split: ASplit) -> bool {
        if split.is_trivial(self.ntax) {
            return false;
        }
        self.splits.push(split);
        true
    }

    pub fn ntax(&self) -> usize {
        self.ntax
    }

    pub fn nsplits(&self) -> usize {
        self.splits.len()
    }

    /// Split with the given 1-based index.
    pub fn get(&self, s: usize) -> Option<&ASplit> {
        s.checked_sub(1).and_then(|i| self.splits.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ASplit> {
        self.splits.iter()
    }

    pub fn cycle(&self) -> Option<&[usize]> {
        self.cycle.as_deref()
    }

    pub fn fit(&self) -> Option<f64> {
        self.fit
    }

    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    pub fn compatibility(&self) -> Compatibility {
        self.compatibility
    }

    pub fn format(&self) -> &SplitsFormat {
        &self.format
    }
}

/// Whether `cycle` contains every index of `1..=n` exactly once.
pub fn is_permutation(cycle: &[usize], n: usize) -> bool {
    if cycle.len() != n {
        return false;
    }
    let mut seen = vec![false; n + 1];
    for &t in cycle {
        if t == 0 || t > n || seen[t] {
            return false;
        }
        seen[t] = true;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxa_set_basics() {
        let set: TaxaSet = [1, 3, 70].into_iter().collect();
        assert!(set.contains(70));
        assert!(!set.contains(2));
        assert_eq!(set.cardinality(), 3);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 3, 70]);
        assert_eq!(set.to_string(), "1 3 70");
    }

    #[test]
    fn test_trivial_splits() {
        let full: TaxaSet = (1..=4).collect();
        assert!(ASplit::new(full, 1.0).is_trivial(4));
        assert!(ASplit::new(TaxaSet::new(), 1.0).is_trivial(4));
        assert!(!ASplit::new([1, 2].into_iter().collect(), 1.0).is_trivial(4));
    }

    #[test]
    fn test_permutation() {
        assert!(is_permutation(&[2, 3, 1], 3));
        assert!(!is_permutation(&[1, 1, 3], 3));
        assert!(!is_permutation(&[1, 2], 3));
    }
}
