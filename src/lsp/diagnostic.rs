//! Diagnostic reports kept on a buffer

use lsp_types::{Diagnostic, DiagnosticSeverity, Range};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSeverity {
    Error,
    Warning,
}

/// One error or warning anchored to a range of the document
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticReport {
    pub range: Range,
    pub message: String,
    pub severity: ReportSeverity,
    pub source: Option<String>,
}

impl DiagnosticReport {
    /// Keeps errors and warnings; hints, information and diagnostics
    /// without a severity are dropped.
    pub fn from_lsp(diagnostic: &Diagnostic) -> Option<Self> {
        let severity = match diagnostic.severity? {
            DiagnosticSeverity::ERROR => ReportSeverity::Error,
            DiagnosticSeverity::WARNING => ReportSeverity::Warning,
            _ => return None,
        };
        Some(Self {
            range: diagnostic.range,
            message: diagnostic.message.clone(),
            severity,
            source: diagnostic.source.clone(),
        })
    }

    pub fn is_error(&self) -> bool {
        self.severity == ReportSeverity::Error
    }
}

pub fn collect_reports(diagnostics: &[Diagnostic]) -> Vec<DiagnosticReport> {
    diagnostics
        .iter()
        .filter_map(DiagnosticReport::from_lsp)
        .collect()
}
