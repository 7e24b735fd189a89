//! Output of the Visual Studio discovery helper (`vswhere -format xml -find ..`).
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <files>
//!   <file>C:\..\MSBuild\Current\Bin\MSBuild.exe</file>
//!   <file>C:\..\MSBuild\Current\Bin\amd64\MSBuild.exe</file>
//! </files>
//! ```

use super::{ArtifactError, element_text, parse_document};

/// Text of every `<file>` element, in document order.
pub fn parse_candidate_files(xml: &str) -> Result<Vec<String>, ArtifactError> {
    let doc = parse_document(xml)?;
    Ok(doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "file")
        .filter_map(element_text)
        .collect())
}

/// Pick the winning candidate.
///
/// Candidates containing `prefer` (case-insensitive) move ahead of the rest;
/// otherwise the helper's own ordering is kept.
pub fn select_candidate<'a>(candidates: &'a [String], prefer: Option<&str>) -> Option<&'a str> {
    let prefer = prefer.map(str::to_lowercase).filter(|p| !p.is_empty());
    let mut ordered: Vec<&String> = candidates.iter().collect();
    if let Some(prefer) = prefer {
        ordered.sort_by_key(|c| !c.to_lowercase().contains(&prefer));
    }
    ordered.first().map(|c| c.as_str())
}
