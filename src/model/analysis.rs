//! Free text result of an analysis run on other blocks.

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisBlock {
    result: String,
}

impl AnalysisBlock {
    pub fn new<R: Into<String>>(result: R) -> Self {
        Self {
            result: result.into(),
        }
    }

    pub fn result(&self) -> &str {
        &self.result
    }
}
