//! Genome records: per-taxon lists of parts stored inline or in files.

/// Where the bases of a part are.
#[derive(Debug, Clone, PartialEq)]
pub enum PartContent {
    Sequence(String),
    File { path: String, offset: u64, size: u64 },
}

/// One part (e.g. chromosome or contig) of a genome.
#[derive(Debug, Clone, PartialEq)]
pub struct GenomePart {
    pub name: Option<String>,
    pub content: PartContent,
}

impl GenomePart {
    pub fn sequence<S: Into<String>>(sequence: S) -> Self {
        Self {
            name: None,
            content: PartContent::Sequence(sequence.into()),
        }
    }

    pub fn file<P: Into<String>>(path: P, offset: u64, size: u64) -> Self {
        Self {
            name: None,
            content: PartContent::File {
                path: path.into(),
                offset,
                size,
            },
        }
    }

    pub fn with_name<N: Into<String>>(mut self, name: N) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Number of bases of this part.
    pub fn length(&self) -> u64 {
        match &self.content {
            PartContent::Sequence(sequence) => sequence.len() as u64,
            PartContent::File { size, .. } => *size,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.content, PartContent::File { .. })
    }
}

/// The genome of one taxon.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Genome {
    pub parts: Vec<GenomePart>,
}

impl Genome {
    pub fn new(parts: Vec<GenomePart>) -> Self {
        Self { parts }
    }

    /// Total length, the sum of the part lengths.
    pub fn length(&self) -> u64 {
        self.parts.iter().map(GenomePart::length).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenomesFormat {
    pub labels: bool,
    /// Rows may consist of more than one part
    pub multi_part: bool,
    /// Parts may refer to files
    pub files: bool,
}

impl Default for GenomesFormat {
    fn default() -> Self {
        Self {
            labels: true,
            multi_part: false,
            files: false,
        }
    }
}

impl GenomesFormat {
    pub fn with_labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_multi_part(mut self, multi_part: bool) -> Self {
        self.multi_part = multi_part;
        self
    }

    pub fn with_files(mut self, files: bool) -> Self {
        self.files = files;
        self
    }
}

// =#========================================================================#=
// GENOMES BLOCK
// =#========================================================================$=
/// One [Genome] per taxon, in taxon order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenomesBlock {
    genomes: Vec<Genome>,
    format: GenomesFormat,
}

impl GenomesBlock {
    pub fn new(genomes: Vec<Genome>) -> Self {
        Self {
            genomes,
            format: GenomesFormat::default(),
        }
    }

    pub fn with_format(mut self, format: GenomesFormat) -> Self {
        self.format = format;
        self
    }

    pub fn ntax(&self) -> usize {
        self.genomes.len()
    }

    /// Genome of taxon `t` (1-based).
    pub fn get(&self, t: usize) -> Option<&Genome> {
        t.checked_sub(1).and_then(|i| self.genomes.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Genome> {
        self.genomes.iter()
    }

    pub fn format(&self) -> &GenomesFormat {
        &self.format
    }
}
