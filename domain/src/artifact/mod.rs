//! Parsers for the structured artifacts external tools produce or consume.
//!
//! All parsers work on document text and never touch the file system; a
//! malformed document is an [`ArtifactError`], never a panic.
//!
//! | Artifact | Parser |
//! |----------|--------|
//! | `.trx` test results | [`parse_test_run`] |
//! | `packages.config` | [`parse_packages_config`] |
//! | SDK-style project files | [`parse_package_references`] |
//! | Project version properties | [`apply_project_version`] |
//! | Discovery helper XML | [`parse_candidate_files`] |

pub mod candidates;
pub mod manifest;
pub mod project_version;
pub mod test_run;

use thiserror::Error;

pub use candidates::{parse_candidate_files, select_candidate};
pub use manifest::{parse_package_references, parse_packages_config};
pub use project_version::{ProjectVersionEdit, VersionFields, apply_project_version};
pub use test_run::{ParsedTestRun, TestOutcome, TestRecord, parse_duration, parse_test_run};

/// Error parsing an artifact document.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("expected root element <{expected}> but found <{found}>")]
    UnexpectedRoot { expected: &'static str, found: String },

    #[error("document is empty")]
    Empty,
}

/// Parse `text`, rejecting blank documents up front.
pub(crate) fn parse_document(text: &str) -> Result<roxmltree::Document<'_>, ArtifactError> {
    if text.trim().is_empty() {
        return Err(ArtifactError::Empty);
    }
    Ok(roxmltree::Document::parse(text)?)
}

/// Check the root element's local name.
pub(crate) fn expect_root<'a, 'input>(
    doc: &'a roxmltree::Document<'input>,
    expected: &'static str,
) -> Result<roxmltree::Node<'a, 'input>, ArtifactError> {
    let root = doc.root_element();
    if root.tag_name().name() == expected {
        Ok(root)
    } else {
        Err(ArtifactError::UnexpectedRoot {
            expected,
            found: root.tag_name().name().to_string(),
        })
    }
}

/// First element child of `node` with the given local name.
pub(crate) fn child<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

/// Concatenated, trimmed text of an element; `None` when blank.
pub(crate) fn element_text(node: roxmltree::Node<'_, '_>) -> Option<String> {
    let text: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
