//! `anyOf` resolution with nullability inferred from `required` markers

use super::expr::{push_unique, split_union};
use super::{ChildResolver, SchemaComponentsIndex, SchemaNode};
use swagger_query_gen_common::{GeneratorError, Placeholders, Result};
use tracing::debug;

/// Nullability decision for a node.
///
/// An explicit flag wins. Otherwise `schema_path[0]` names the containing
/// component and `schema_path[1]` the property, and the component's required
/// list decides. Short paths and lookup misses count as "not required".
pub fn is_required(node: &SchemaNode, index: &SchemaComponentsIndex) -> bool {
    if let Some(flag) = node.required {
        return flag;
    }

    match node.schema_path.as_slice() {
        [type_name, property, ..] => index.is_property_required(type_name, property),
        _ => false,
    }
}

/// Resolve an `anyOf` node into a single union expression.
///
/// The any placeholder never survives as a member. The null placeholder is
/// dropped from required nodes and added to optional ones. Every member is
/// resolved through `children` with the parent's decision forwarded as its
/// `required` flag. When nothing survives filtering the any placeholder is
/// returned on its own.
pub fn resolve_any_of(
    node: &SchemaNode,
    index: &SchemaComponentsIndex,
    placeholders: &Placeholders,
    children: &dyn ChildResolver,
) -> Result<String> {
    let members = match node.schema.any_of.as_deref() {
        Some(members) if !members.is_empty() => members,
        Some(_) => {
            return Err(GeneratorError::malformed(
                &node.schema_path,
                "anyOf must list at least one schema",
            ))
        }
        None => {
            return Err(GeneratorError::malformed(
                &node.schema_path,
                "expected an anyOf schema",
            ))
        }
    };

    let required = is_required(node, index);
    let mut union: Vec<String> = Vec::new();

    for member in members {
        let child = SchemaNode {
            schema: member.clone(),
            required: Some(member.required_flag().unwrap_or(required)),
            schema_path: node.schema_path.clone(),
        };
        let resolved = children.resolve_child(&child)?;

        for part in split_union(&resolved) {
            if placeholders.is_any(part) || (required && placeholders.is_null(part)) {
                continue;
            }
            push_unique(&mut union, part);
        }
    }

    if union.is_empty() {
        debug!(
            path = %node.schema_path.join("."),
            "every anyOf member was excluded, falling back to {}",
            placeholders.any
        );
        return Ok(placeholders.any.clone());
    }

    if !required {
        push_unique(&mut union, &placeholders.null);
    }

    Ok(union.join(" | "))
}
