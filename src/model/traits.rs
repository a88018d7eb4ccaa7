//! Trait tables: per-taxon values for a number of named traits.

/// A single trait value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraitValue {
    Missing,
    Number(f64),
    /// Code of a categorical value, see [TraitsBlock::category_label()]
    Category(usize),
}

/// Separator between values of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    Whitespace,
    Comma,
}

impl Separator {
    pub fn name(&self) -> &'static str {
        match self {
            Separator::Whitespace => "whitespace",
            Separator::Comma => "comma",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "whitespace" | "space" | "tab" => Some(Separator::Whitespace),
            "comma" => Some(Separator::Comma),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraitsFormat {
    pub labels: bool,
    pub missing: char,
    pub separator: Separator,
}

impl Default for TraitsFormat {
    fn default() -> Self {
        Self {
            labels: true,
            missing: '?',
            separator: Separator::Whitespace,
        }
    }
}

impl TraitsFormat {
    pub fn with_labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_missing(mut self, missing: char) -> Self {
        self.missing = missing;
        self
    }

    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }
}

/// Description of one trait column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trait {
    pub label: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Categorical value labels, code = position
    categories: Vec<String>,
}

impl Trait {
    pub fn new<L: Into<String>>(label: L) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Returns the code of a categorical value, allocating the next code if new.
    pub fn category_code(&mut self, value: &str) -> usize {
        match self.categories.iter().position(|c| c == value) {
            Some(code) => code,
            None => {
                self.categories.push(value.to_string());
                self.categories.len() - 1
            }
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

// =#========================================================================#=
// TRAITS BLOCK
// =#========================================================================$=
/// An ntax × ntraits table of [TraitValue]s (both 1-based).
#[derive(Debug, Clone, PartialEq)]
pub struct TraitsBlock {
    traits: Vec<Trait>,
    values: Vec<Vec<TraitValue>>,
    format: TraitsFormat,
}

impl TraitsBlock {
    /// Creates a table of missing values with traits named `trait1..`.
    pub fn new(ntax: usize, ntraits: usize) -> Self {
        Self {
            traits: (1..=ntraits).map(|i| Trait::new(format!("trait{i}"))).collect(),
            values: vec![vec![TraitValue::Missing; ntraits]; ntax],
            format: TraitsFormat::default(),
        }
    }

    pub fn with_format(mut self, format: TraitsFormat) -> Self {
        self.format = format;
        self
    }

    pub fn ntax(&self) -> usize {
        self.values.len()
    }

    pub fn ntraits(&self) -> usize {
        self.traits.len()
    }

    pub fn format(&self) -> &TraitsFormat {
        &self.format
    }

    /// Trait with the given 1-based index.
    pub fn trait_info(&self, i: usize) -> &Trait {
        &self.traits[i - 1]
    }

    pub fn trait_info_mut(&mut self, i: usize) -> &mut Trait {
        &mut self.traits[i - 1]
    }

    pub fn traits(&self) -> &[Trait] {
        &self.traits
    }

    /// Value of taxon `t` for trait `i` (both 1-based).
    pub fn get(&self, t: usize, i: usize) -> TraitValue {
        self.values[t - 1][i - 1]
    }

    pub fn set(&mut self, t: usize, i: usize, value: TraitValue) {
        self.values[t - 1][i - 1] = value;
    }

    /// Sets a categorical value, allocating its code on first use.
    pub fn set_category(&mut self, t: usize, i: usize, value: &str) {
        let code = self.traits[i - 1].category_code(value);
        self.values[t - 1][i - 1] = TraitValue::Category(code);
    }

    /// Label of a categorical code of trait `i`.
    pub fn category_label(&self, i: usize, code: usize) -> Option<&str> {
        self.traits[i - 1].categories.get(code).map(|c| c.as_str())
    }

    /// Whether any trait has geographic coordinates.
    pub fn has_coordinates(&self) -> bool {
        self.traits
            .iter()
            .any(|t| t.latitude.is_some() || t.longitude.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_allocated_on_first_sight() {
        let mut traits = TraitsBlock::new(3, 1);
        traits.set_category(1, 1, "red");
        traits.set_category(2, 1, "blue");
        traits.set_category(3, 1, "red");
        assert_eq!(traits.get(1, 1), TraitValue::Category(0));
        assert_eq!(traits.get(2, 1), TraitValue::Category(1));
        assert_eq!(traits.get(3, 1), TraitValue::Category(0));
        assert_eq!(traits.category_label(1, 1), Some("blue"));
    }
}
