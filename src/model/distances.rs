//! Symmetric distance matrices between taxa.

/// Which part of the matrix is written per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Triangle {
    Lower,
    Upper,
    #[default]
    Both,
}

impl Triangle {
    pub fn name(&self) -> &'static str {
        match self {
            Triangle::Lower => "lower",
            Triangle::Upper => "upper",
            Triangle::Both => "both",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "lower" => Some(Triangle::Lower),
            "upper" => Some(Triangle::Upper),
            "both" => Some(Triangle::Both),
            _ => None,
        }
    }

    /// Inclusive range of columns stored in row `t` of an `n` × `n` matrix.
    ///
    /// lower → `[1, t - diag]`, upper → `[t + diag, n]`, both → `[1, n]`,
    /// where `diag` is 0 if the diagonal is stored and 1 otherwise.
    pub fn columns(&self, t: usize, n: usize, diagonal: bool) -> (usize, usize) {
        let skip = usize::from(!diagonal);
        match self {
            Triangle::Lower => (1, t - skip),
            Triangle::Upper => (t + skip, n),
            Triangle::Both => (1, n),
        }
    }
}

/// Layout options of a distances MATRIX.
#[derive(Debug, Clone, PartialEq)]
pub struct DistancesFormat {
    pub triangle: Triangle,
    pub diagonal: bool,
    pub labels: bool,
    /// A VARMATRIX follows the MATRIX
    pub variance: bool,
}

impl Default for DistancesFormat {
    fn default() -> Self {
        Self {
            triangle: Triangle::Both,
            diagonal: true,
            labels: true,
            variance: false,
        }
    }
}

impl DistancesFormat {
    pub fn with_triangle(mut self, triangle: Triangle) -> Self {
        self.triangle = triangle;
        self
    }

    pub fn with_diagonal(mut self, diagonal: bool) -> Self {
        self.diagonal = diagonal;
        self
    }

    pub fn with_labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_variance(mut self, variance: bool) -> Self {
        self.variance = variance;
        self
    }
}

// =#========================================================================#=
// DISTANCES BLOCK
// =#========================================================================$=
/// An ntax × ntax symmetric distance matrix, optionally with variances.
#[derive(Debug, Clone, PartialEq)]
pub struct DistancesBlock {
    distances: Vec<Vec<f64>>,
    variances: Option<Vec<Vec<f64>>>,
    format: DistancesFormat,
}

impl DistancesBlock {
    /// Creates an all-zero matrix for `ntax` taxa.
    pub fn new(ntax: usize) -> Self {
        Self {
            distances: vec![vec![0.0; ntax]; ntax],
            variances: None,
            format: DistancesFormat::default(),
        }
    }

    pub fn with_format(mut self, format: DistancesFormat) -> Self {
        self.format = format;
        self
    }

    pub fn ntax(&self) -> usize {
        self.distances.len()
    }

    pub fn format(&self) -> &DistancesFormat {
        &self.format
    }

    /// Distance between taxa `i` and `j` (1-based).
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.distances[i - 1][j - 1]
    }

    /// Sets the distance between `i` and `j` in both directions.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.distances[i - 1][j - 1] = value;
        self.distances[j - 1][i - 1] = value;
    }

    pub fn has_variances(&self) -> bool {
        self.variances.is_some()
    }

    /// Variance of the distance between `i` and `j`, if variances are present.
    pub fn variance(&self, i: usize, j: usize) -> Option<f64> {
        self.variances.as_ref().map(|v| v[i - 1][j - 1])
    }

    /// Sets a variance in both directions, creating the variance matrix on demand.
    pub fn set_variance(&mut self, i: usize, j: usize, value: f64) {
        let n = self.ntax();
        let variances = self.variances.get_or_insert_with(|| vec![vec![0.0; n]; n]);
        variances[i - 1][j - 1] = value;
        variances[j - 1][i - 1] = value;
    }
}
