use crate::error::Result;
use crate::schema::document::Document;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::collections::{HashSet, VecDeque};
use std::fmt;

/// A single validation finding with its diagnostic path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Location in the document, e.g. `pages[0].rootId` or `nodes.<id>.parentId`
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Result of validating a v2 document
///
/// Errors make the document invalid; warnings are informational.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// Validate a typed document
///
/// Serializes the document and runs [`validate_document`] on the JSON form, so
/// typed documents and documents read from disk go through the same checks.
pub fn validate_scene_document(document: &Document) -> Result<ValidationResult> {
    let value = serde_json::to_value(document)?;
    Ok(validate_document(&value))
}

/// Check the structural invariants of a v2 document
///
/// Errors:
/// - missing `version`, `id`, `pages` or `nodes`
/// - a page root that is missing or not a FRAME
/// - a `parentId` or child id referencing a missing node
///
/// Warnings:
/// - a page root with a non-null `parentId`
/// - parent/child listings that disagree
/// - nodes unreachable from every page root (orphans)
///
/// # Arguments
/// * `tree` - The JSON form of a v2 document
///
/// # Returns
/// The validation result; `valid` is true when there are no errors.
///
/// # Examples
/// ```
/// use layout2scene::schema::validate_document;
/// use serde_json::json;
///
/// let result = validate_document(&json!({"version": "2.0.0", "id": "d"}));
/// assert!(!result.valid);
/// assert_eq!(result.errors.len(), 2);
/// ```
pub fn validate_document(tree: &JsonValue) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // 1. Top-level containers
    for key in ["version", "id"] {
        let present = tree
            .get(key)
            .and_then(|v| v.as_str())
            .is_some_and(|s| !s.is_empty());
        if !present {
            errors.push(ValidationIssue::new(key, format!("Missing document {key}")));
        }
    }

    let pages = tree.get("pages").and_then(|v| v.as_array());
    if pages.is_none() {
        errors.push(ValidationIssue::new("pages", "Missing pages array"));
    }

    let nodes = tree.get("nodes").and_then(|v| v.as_object());
    if nodes.is_none() {
        errors.push(ValidationIssue::new("nodes", "Missing nodes map"));
    }

    let empty_nodes = Map::new();
    let nodes = nodes.unwrap_or(&empty_nodes);

    // 2. Page roots
    let mut roots = Vec::new();
    for (index, page) in pages.map(Vec::as_slice).unwrap_or(&[]).iter().enumerate() {
        let path = format!("pages[{index}].rootId");
        let Some(root_id) = page.get("rootId").and_then(|v| v.as_str()) else {
            errors.push(ValidationIssue::new(path, "Page has no rootId"));
            continue;
        };

        let Some(root) = nodes.get(root_id) else {
            errors.push(ValidationIssue::new(
                path,
                format!("Root node {root_id} not found in nodes"),
            ));
            continue;
        };

        let kind = node_type(root);
        if kind != "FRAME" {
            errors.push(ValidationIssue::new(
                path,
                format!("Root node {root_id} is {kind}, expected FRAME"),
            ));
        }

        if parent_id(root).is_some() {
            warnings.push(ValidationIssue::new(
                format!("nodes.{root_id}.parentId"),
                "Page root should not have a parent",
            ));
        }

        roots.push(root_id);
    }

    // 3. Parent and child references
    for (id, node) in nodes {
        if let Some(parent) = parent_id(node) {
            match nodes.get(parent) {
                None => errors.push(ValidationIssue::new(
                    format!("nodes.{id}.parentId"),
                    format!("Parent {parent} not found"),
                )),
                Some(parent_node) => {
                    if !child_ids(parent_node).any(|child| child == id.as_str()) {
                        warnings.push(ValidationIssue::new(
                            format!("nodes.{id}.parentId"),
                            format!("Parent {parent} does not list this node as a child"),
                        ));
                    }
                }
            }
        }

        for (position, child) in child_ids(node).enumerate() {
            let path = format!("nodes.{id}.children[{position}]");
            match nodes.get(child) {
                None => errors.push(ValidationIssue::new(path, format!("Child {child} not found"))),
                Some(child_node) => {
                    if parent_id(child_node) != Some(id.as_str()) {
                        warnings.push(ValidationIssue::new(
                            path,
                            format!("Child {child} has a different parentId"),
                        ));
                    }
                }
            }
        }
    }

    // 4. Reachability from page roots
    let reachable = reachable_from(&roots, nodes);
    for id in nodes.keys() {
        if !reachable.contains(id.as_str()) {
            warnings.push(ValidationIssue::new(
                format!("nodes.{id}"),
                "Orphaned node is not reachable from any page root",
            ));
        }
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Breadth-first walk over `children` starting at every page root
fn reachable_from<'a>(roots: &[&'a str], nodes: &'a Map<String, JsonValue>) -> HashSet<&'a str> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = roots.iter().copied().collect();

    while let Some(id) = queue.pop_front() {
        let Some((key, node)) = nodes.get_key_value(id) else {
            continue;
        };
        if !seen.insert(key.as_str()) {
            continue;
        }
        queue.extend(child_ids(node));
    }

    seen
}

fn node_type(node: &JsonValue) -> &str {
    node.get("type").and_then(|v| v.as_str()).unwrap_or("untyped")
}

fn parent_id(node: &JsonValue) -> Option<&str> {
    node.get("parentId").and_then(|v| v.as_str())
}

fn child_ids(node: &JsonValue) -> impl Iterator<Item = &str> {
    node.get("children")
        .and_then(|v| v.as_array())
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(pages: JsonValue, nodes: JsonValue) -> JsonValue {
        json!({
            "version": "2.0.0",
            "id": "doc-1",
            "pages": pages,
            "nodes": nodes
        })
    }

    #[test]
    fn test_valid_document() {
        let tree = doc(
            json!([{"rootId": "root"}]),
            json!({
                "root": {"type": "FRAME", "parentId": null, "children": ["t1"]},
                "t1": {"type": "TEXT", "parentId": "root"}
            }),
        );

        let result = validate_document(&tree);
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_containers() {
        let result = validate_document(&json!({}));
        let paths: Vec<&str> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["version", "id", "pages", "nodes"]);
        assert!(!result.valid);
    }

    #[test]
    fn test_root_missing_or_not_frame() {
        let tree = doc(
            json!([{"rootId": "nope"}, {"rootId": "t1"}, {}]),
            json!({"t1": {"type": "TEXT", "parentId": null}}),
        );

        let result = validate_document(&tree);
        assert_eq!(result.errors.len(), 3);
        assert_eq!(result.errors[0].path, "pages[0].rootId");
        assert!(result.errors[1].message.contains("expected FRAME"));
        assert_eq!(result.errors[2].path, "pages[2].rootId");
    }

    #[test]
    fn test_root_with_parent_is_warning() {
        let tree = doc(
            json!([{"rootId": "root"}]),
            json!({
                "outer": {"type": "FRAME", "parentId": null, "children": ["root"]},
                "root": {"type": "FRAME", "parentId": "outer", "children": []}
            }),
        );

        let result = validate_document(&tree);
        assert!(result.valid);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.message == "Page root should not have a parent"));
        // "outer" is not reachable from the page root
        assert!(result.warnings.iter().any(|w| w.path == "nodes.outer"));
    }

    #[test]
    fn test_dangling_references_are_errors() {
        let tree = doc(
            json!([{"rootId": "root"}]),
            json!({
                "root": {"type": "FRAME", "parentId": null, "children": ["ghost"]},
                "lost": {"type": "TEXT", "parentId": "missing"}
            }),
        );

        let result = validate_document(&tree);
        assert!(!result.valid);
        let paths: Vec<String> = result.errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "nodes.root.children[0]: Child ghost not found",
                "nodes.lost.parentId: Parent missing not found",
            ]
        );
    }

    #[test]
    fn test_listing_mismatch_is_warning() {
        let tree = doc(
            json!([{"rootId": "root"}]),
            json!({
                "root": {"type": "FRAME", "parentId": null, "children": ["a"]},
                "a": {"type": "TEXT", "parentId": "other"},
                "other": {"type": "FRAME", "parentId": "root", "children": []}
            }),
        );

        let result = validate_document(&tree);
        assert!(result.valid);
        let paths: Vec<&str> = result.warnings.iter().map(|w| w.path.as_str()).collect();
        assert!(paths.contains(&"nodes.a.parentId"));
        assert!(paths.contains(&"nodes.root.children[0]"));
        assert!(paths.contains(&"nodes.other.parentId"));
        assert!(paths.contains(&"nodes.other"));
    }

    #[test]
    fn test_cycles_terminate() {
        let tree = doc(
            json!([{"rootId": "root"}]),
            json!({
                "root": {"type": "FRAME", "parentId": null, "children": ["a"]},
                "a": {"type": "FRAME", "parentId": "root", "children": ["root"]}
            }),
        );

        let result = validate_document(&tree);
        assert!(result.valid);
        assert!(!result.warnings.iter().any(|w| w.message.contains("Orphaned")));
    }
}
