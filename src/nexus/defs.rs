//! Nexus format keywords as written.
//!
//! Keywords are matched ignoring case when reading; these constants fix the
//! spelling used when writing.

/// Nexus file header "#NEXUS"
pub(crate) const NEXUS_HEADER: &[u8] = b"#NEXUS";

/// Block begin keyword "BEGIN"
pub(crate) const BLOCK_BEGIN: &[u8] = b"BEGIN";

/// Block end keyword "END;" (with semicolon)
pub(crate) const BLOCK_END: &[u8] = b"END;";

// Commands shared by several blocks
pub(crate) const TITLE: &[u8] = b"TITLE";
pub(crate) const LINK: &[u8] = b"LINK";
pub(crate) const DIMENSIONS: &[u8] = b"DIMENSIONS";
pub(crate) const FORMAT: &[u8] = b"FORMAT";
pub(crate) const PROPERTIES: &[u8] = b"PROPERTIES";
pub(crate) const MATRIX: &[u8] = b"MATRIX";

// Taxa block
pub(crate) const TAXLABELS: &[u8] = b"TAXLABELS";
pub(crate) const DISPLAYLABELS: &[u8] = b"DISPLAYLABELS";
pub(crate) const TAXINFO: &[u8] = b"TAXINFO";

// Characters block
pub(crate) const CHARWEIGHTS: &[u8] = b"CHARWEIGHTS";
pub(crate) const CHARSTATELABELS: &[u8] = b"CHARSTATELABELS";

// Distances block
pub(crate) const VARMATRIX: &[u8] = b"VARMATRIX";

// Splits block
pub(crate) const THRESHOLD: &[u8] = b"THRESHOLD";
pub(crate) const CYCLE: &[u8] = b"CYCLE";

// Trees block
pub(crate) const TRANSLATE: &[u8] = b"TRANSLATE";
pub(crate) const TREE: &[u8] = b"TREE";

// Network block
pub(crate) const TYPE: &[u8] = b"TYPE";
pub(crate) const NODES: &[u8] = b"NODES";
pub(crate) const EDGES: &[u8] = b"EDGES";

// Traits block
pub(crate) const TRAITLATITUDE: &[u8] = b"TRAITLATITUDE";
pub(crate) const TRAITLONGITUDE: &[u8] = b"TRAITLONGITUDE";
pub(crate) const TRAITLABELS: &[u8] = b"TRAITLABELS";

// Analysis block
pub(crate) const RESULT: &[u8] = b"RESULT";

/// Written for absent display labels and taxon info
pub(crate) const NULL: &str = "null";
