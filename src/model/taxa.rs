//! Taxa: the named units every other block refers to by 1-based index.

use std::collections::HashMap;
use thiserror::Error;

/// Error when adding a taxon whose name is already taken.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("duplicate taxon name '{0}'")]
pub struct DuplicateTaxon(pub String);

/// A single taxon.
#[derive(Debug, Clone, PartialEq)]
pub struct Taxon {
    /// Unique name, case preserved
    pub name: String,
    /// Alternative label for display (DISPLAYLABELS)
    pub display_label: Option<String>,
    /// Free text information (TAXINFO)
    pub info: Option<String>,
}

impl Taxon {
    /// Creates a taxon with only a name.
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            display_label: None,
            info: None,
        }
    }
}

// =#========================================================================#=
// TAXA BLOCK
// =#========================================================================$=
/// Ordered list of [Taxon] with unique names.
///
/// The position of a taxon defines its canonical index (1-based), which is
/// how characters rows, distances, splits and tree leaves refer to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaxaBlock {
    taxa: Vec<Taxon>,
    /// Name to 0-based position
    positions: HashMap<String, usize>,
}

impl TaxaBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a block from names, in order.
    ///
    /// # Errors
    /// [DuplicateTaxon] if a name occurs twice.
    pub fn from_names<I, N>(names: I) -> Result<Self, DuplicateTaxon>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let mut block = Self::new();
        for name in names {
            block.add(Taxon::new(name))?;
        }
        Ok(block)
    }

    /// Appends a taxon and returns its 1-based index.
    pub fn add(&mut self, taxon: Taxon) -> Result<usize, DuplicateTaxon> {
        if self.positions.contains_key(&taxon.name) {
            return Err(DuplicateTaxon(taxon.name));
        }
        self.positions.insert(taxon.name.clone(), self.taxa.len());
        self.taxa.push(taxon);
        Ok(self.taxa.len())
    }

    /// Number of taxa.
    pub fn ntax(&self) -> usize {
        self.taxa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taxa.is_empty()
    }

    /// Returns the taxon with the given 1-based index.
    pub fn get(&self, t: usize) -> Option<&Taxon> {
        t.checked_sub(1).and_then(|i| self.taxa.get(i))
    }

    /// Returns a mutable reference to the taxon with the given 1-based index.
    pub fn get_mut(&mut self, t: usize) -> Option<&mut Taxon> {
        t.checked_sub(1).and_then(|i| self.taxa.get_mut(i))
    }

    /// Returns the name of the taxon with the given 1-based index.
    pub fn name(&self, t: usize) -> Option<&str> {
        self.get(t).map(|taxon| taxon.name.as_str())
    }

    /// Returns the 1-based index of the taxon with the given name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.positions.get(name).map(|i| i + 1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Taxon> {
        self.taxa.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.taxa.iter().map(|t| t.name.as_str())
    }

    /// Whether any taxon has a display label.
    pub fn has_display_labels(&self) -> bool {
        self.taxa.iter().any(|t| t.display_label.is_some())
    }

    /// Whether any taxon has info.
    pub fn has_info(&self) -> bool {
        self.taxa.iter().any(|t| t.info.is_some())
    }
}
