//! Class-name table and arg-max classification over raw scores.

use std::path::Path;

use tracing::debug;

use crate::error::{BoundsError, Error};

/// Ordered class names, indexed by class id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    names: Vec<String>,
}

impl Labels {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Parse one label per line, stopping at the first empty line.
    pub fn parse(text: &str) -> Self {
        let names = text
            .lines()
            .take_while(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        Self { names }
    }

    /// Read and [`parse`](Self::parse) a label file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Labels {
            path: path.to_path_buf(),
            source,
        })?;
        let labels = Self::parse(&text);
        debug!(path = %path.display(), count = labels.len(), "loaded labels");
        Ok(labels)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Label for `index`.
    pub fn get(&self, index: usize) -> Result<&str, BoundsError> {
        self.names
            .get(index)
            .map(String::as_str)
            .ok_or(BoundsError::Label {
                index,
                len: self.names.len(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Pick the best-scoring class and its label.
    pub fn classify(&self, scores: &[f32]) -> Result<(usize, &str), BoundsError> {
        let index = argmax(scores)?;
        Ok((index, self.get(index)?))
    }
}

/// Index of the greatest score; the first one wins on ties.
pub fn argmax(scores: &[f32]) -> Result<usize, BoundsError> {
    let (&first, rest) = scores.split_first().ok_or(BoundsError::EmptyScores)?;
    let mut best = 0;
    let mut max_score = first;
    for (i, &score) in rest.iter().enumerate() {
        if score > max_score {
            max_score = score;
            best = i + 1;
        }
    }
    Ok(best)
}
