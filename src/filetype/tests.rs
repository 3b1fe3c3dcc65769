use std::path::Path;

use super::*;

fn classify(path: &str, content: &str) -> String {
    RegexClassifier::default().classify(Path::new(path), content)
}

#[test]
fn test_by_extension() {
    assert_eq!(classify("/src/app.py", ""), "python");
    assert_eq!(classify("README.md", ""), "markdown");
    assert_eq!(classify("config.toml", ""), "toml");
    assert_eq!(classify("/work/Dockerfile", ""), "dockerfile");
}

#[test]
fn test_unknown_is_file() {
    assert_eq!(classify("notes.xyz", "anything"), FALLBACK_FILETYPE);
    assert_eq!(classify("", ""), FALLBACK_FILETYPE);
}

#[test]
fn test_content_breaks_header_tie() {
    // Both c and cpp claim .h
    assert_eq!(classify("types.h", "int add(int a, int b);"), "c");
    assert_eq!(
        classify("types.h", "namespace geo {\nclass Point {};\n}"),
        "cpp"
    );
}

#[test]
fn test_longer_filename_match_wins() {
    // "r" also matches the ".r" prefix of ".rs"
    assert_eq!(classify("main.rs", ""), "rust");
    assert_eq!(classify("main.rs", "fn main() {}\n"), "rust");
    assert_eq!(classify("analysis.R", "x <- c(1, 2)\n"), "r");
}

#[test]
fn test_add_filetype() {
    let mut classifier = RegexClassifier::empty();
    assert!(classifier.is_empty());
    assert_eq!(classifier.classify(Path::new("a.sno"), ""), "file");

    classifier.add_filetype("snofile", r".*\.sno$", None).unwrap();
    assert_eq!(classifier.len(), 1);
    assert_eq!(classifier.classify(Path::new("a.sno"), ""), "snofile");
}

#[test]
fn test_add_filetype_rejects_bad_pattern() {
    let mut classifier = RegexClassifier::empty();
    assert!(classifier.add_filetype("broken", r"(", None).is_err());
    assert!(classifier.is_empty());
}

#[test]
fn test_defaults_all_compile() {
    assert_eq!(
        RegexClassifier::default().len(),
        defaults::DEFAULT_FILETYPES.len()
    );
}
