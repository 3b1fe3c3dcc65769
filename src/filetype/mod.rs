//! Filetype detection
//!
//! A filetype is picked by scoring regex patterns against the file name
//! and, as a tie breaker, against the file contents.

use std::path::Path;

use regex::Regex;

mod defaults;

/// Filetype name used when nothing matches
pub const FALLBACK_FILETYPE: &str = "file";

/// Content score of a filetype that has no content pattern. It ranks
/// above a content pattern that failed to match.
const NO_CONTENT_PATTERN_SCORE: f64 = 0.1;

/// Maps a path and its contents to a language id
pub trait FileTypeClassifier: Send + Sync {
    fn classify(&self, path: &Path, content: &str) -> String;
}

struct FileTypeEntry {
    name: String,
    filename: Regex,
    content: Option<Regex>,
}

/// Length of the leftmost match of `pattern` in `target`
fn score(pattern: &Regex, target: &str) -> usize {
    if target.is_empty() {
        return 0;
    }
    pattern.find(target).map_or(0, |m| m.len())
}

pub struct RegexClassifier {
    entries: Vec<FileTypeEntry>,
}

impl RegexClassifier {
    /// Classifier with no filetypes; everything is `"file"`
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn add_filetype(
        &mut self,
        name: &str,
        filename_pattern: &str,
        content_pattern: Option<&str>,
    ) -> Result<(), regex::Error> {
        let entry = FileTypeEntry {
            name: name.to_string(),
            filename: Regex::new(filename_pattern)?,
            content: content_pattern.map(Regex::new).transpose()?,
        };
        self.entries.push(entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RegexClassifier {
    fn default() -> Self {
        let mut classifier = Self::empty();
        for (name, filename, content) in defaults::DEFAULT_FILETYPES {
            if let Err(e) = classifier.add_filetype(name, filename, *content) {
                tracing::warn!(filetype = *name, error = %e, "skipping filetype");
            }
        }
        classifier
    }
}

impl FileTypeClassifier for RegexClassifier {
    fn classify(&self, path: &Path, content: &str) -> String {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        // Earlier entries win ties
        let mut best: Option<(&str, f64, usize)> = None;
        for entry in &self.entries {
            let filename_score = score(&entry.filename, filename);
            if filename_score == 0 {
                continue;
            }
            let content_score = match &entry.content {
                Some(pattern) => score(pattern, content) as f64,
                None => NO_CONTENT_PATTERN_SCORE,
            };
            let better = match best {
                None => true,
                Some((_, best_content, best_filename)) => {
                    content_score > best_content
                        || (content_score == best_content && filename_score > best_filename)
                }
            };
            if better {
                best = Some((entry.name.as_str(), content_score, filename_score));
            }
        }

        best.map_or_else(|| FALLBACK_FILETYPE.to_string(), |(name, _, _)| name.to_string())
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
