use std::path::Path;

use crate::corpus::Corpus;

/// Handle on the small committed corpus used across the test suite.
pub fn test_corpus() -> Corpus {
    Corpus::new(Path::new("data").join("tests").join("corpus"))
}
