//! In-place version stamping of MSBuild project files.
//!
//! Edits are applied to the original text by byte range, so comments,
//! formatting and every element the stamp does not touch stay exactly as
//! they were.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::{ArtifactError, expect_root, parse_document};

/// Version properties to write; `None` or blank fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionFields {
    pub version: Option<String>,
    pub assembly_version: Option<String>,
    pub file_version: Option<String>,
    pub package_version: Option<String>,
}

impl VersionFields {
    /// `(element name, value)` for every supplied field.
    pub fn supplied(&self) -> Vec<(&'static str, &str)> {
        [
            ("Version", &self.version),
            ("AssemblyVersion", &self.assembly_version),
            ("FileVersion", &self.file_version),
            ("PackageVersion", &self.package_version),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            let value = value.as_deref()?.trim();
            (!value.is_empty()).then_some((name, value))
        })
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.supplied().is_empty()
    }
}

/// Result of stamping one project document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectVersionEdit {
    /// The rewritten document
    pub content: String,
    /// Whether `content` differs from the input
    pub changed: bool,
}

/// Set the supplied version properties in a project document.
///
/// Existing elements inside any `PropertyGroup` of the root `Project` are
/// replaced in place. Properties not present yet are appended to the first
/// unconditional property group (or the first one, if all are conditional);
/// a new group is created before `</Project>` when there is none.
pub fn apply_project_version(
    xml: &str,
    fields: &VersionFields,
) -> Result<ProjectVersionEdit, ArtifactError> {
    let doc = parse_document(xml)?;
    let root = expect_root(&doc, "Project")?;

    let groups: Vec<_> = root
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "PropertyGroup")
        .collect();

    let mut edits: Vec<(Range<usize>, String)> = Vec::new();
    let mut missing: Vec<(&str, &str)> = Vec::new();

    for (name, value) in fields.supplied() {
        let existing = groups
            .iter()
            .flat_map(|g| g.children())
            .find(|n| n.is_element() && n.tag_name().name() == name);
        match existing {
            Some(element) => edits.push(replace_content(xml, element, value)),
            None => missing.push((name, value)),
        }
    }

    if !missing.is_empty() {
        let open_groups: Vec<_> = groups
            .iter()
            .filter(|g| !is_self_closing(xml, **g))
            .collect();
        let target = open_groups
            .iter()
            .find(|g| g.attribute("Condition").is_none())
            .or_else(|| open_groups.first());

        match target {
            Some(group) => {
                let indent = child_indent(xml, **group);
                let at = group
                    .children()
                    .filter(|n| n.is_element())
                    .last()
                    .map(|n| n.range().end)
                    .unwrap_or_else(|| start_tag_end(xml, **group));
                let mut text = String::new();
                for (name, value) in &missing {
                    text.push_str(&format!("\n{}{}", indent, element(name, value)));
                }
                edits.push((at..at, text));
            }
            None if is_self_closing(xml, root) => {
                let range = root.range();
                let slice = &xml[range.clone()];
                let mut text = format!("{}>\n  <PropertyGroup>\n", open_part(slice));
                for (name, value) in &missing {
                    text.push_str(&format!("    {}\n", element(name, value)));
                }
                text.push_str(&format!("  </PropertyGroup>\n</{}>", qualified_name(slice)));
                edits.push((range, text));
            }
            None => {
                let indent = root
                    .children()
                    .find(|n| n.is_element())
                    .map(|n| line_indent(xml, n.range().start).to_string())
                    .filter(|i| !i.is_empty())
                    .unwrap_or_else(|| "  ".to_string());
                let at = end_tag_start(xml, root);
                let mut block = String::new();
                if !xml[..at].ends_with('\n') {
                    block.push('\n');
                }
                block.push_str(&format!("{}<PropertyGroup>\n", indent));
                for (name, value) in &missing {
                    block.push_str(&format!("{}{}{}\n", indent, indent, element(name, value)));
                }
                block.push_str(&format!("{}</PropertyGroup>\n", indent));
                edits.push((at..at, block));
            }
        }
    }

    let mut content = xml.to_string();
    edits.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    for (range, text) in edits {
        content.replace_range(range, &text);
    }

    Ok(ProjectVersionEdit {
        changed: content != xml,
        content,
    })
}

fn element(name: &str, value: &str) -> String {
    format!("<{}>{}</{}>", name, escape(value), name)
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn is_self_closing(xml: &str, node: roxmltree::Node<'_, '_>) -> bool {
    xml[node.range()].ends_with("/>")
}

/// Replace an element's content, expanding `<X/>` into `<X>value</X>`.
fn replace_content(xml: &str, node: roxmltree::Node<'_, '_>, value: &str) -> (Range<usize>, String) {
    let range = node.range();
    let slice = &xml[range.clone()];

    if is_self_closing(xml, node) {
        return (
            range,
            format!("{}>{}</{}>", open_part(slice), escape(value), qualified_name(slice)),
        );
    }

    (start_tag_end(xml, node)..end_tag_start(xml, node), escape(value))
}

/// `<X a="b" />` without its `/>`.
fn open_part(self_closing: &str) -> &str {
    self_closing[..self_closing.len() - 2].trim_end()
}

/// The prefixed tag name of an element's text.
fn qualified_name(element: &str) -> &str {
    let name = &element[1..];
    let end = name
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(name.len());
    &name[..end]
}

/// Byte offset just past the `>` of an element's start tag.
fn start_tag_end(xml: &str, node: roxmltree::Node<'_, '_>) -> usize {
    let start = node.range().start;
    let mut quote = None;
    for (i, c) in xml[start..].char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '>') => return start + i + 1,
            _ => {}
        }
    }
    node.range().end
}

/// Byte offset of the `</` of an element's end tag.
fn end_tag_start(xml: &str, node: roxmltree::Node<'_, '_>) -> usize {
    let range = node.range();
    xml[range.clone()]
        .rfind("</")
        .map(|i| range.start + i)
        .unwrap_or(range.end)
}

/// Whitespace between the start of the line and `pos`, or "" if other text precedes it.
fn line_indent(xml: &str, pos: usize) -> &str {
    let line_start = xml[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let prefix = &xml[line_start..pos];
    if prefix.chars().all(char::is_whitespace) {
        prefix
    } else {
        ""
    }
}

fn child_indent(xml: &str, group: roxmltree::Node<'_, '_>) -> String {
    group
        .children()
        .find(|n| n.is_element())
        .map(|n| line_indent(xml, n.range().start).to_string())
        .unwrap_or_else(|| format!("{}  ", line_indent(xml, group.range().start)))
}
