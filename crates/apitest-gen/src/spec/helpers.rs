//! Shared YAML lookup helpers used across the document readers.

use serde_yaml_ng::value::TaggedValue;
use serde_yaml_ng::{Mapping, Value};

/// Known HTTP methods per the OpenAPI specification.
///
/// Path items can also contain `summary`, `description`, `parameters`, and
/// `servers` keys; those are skipped so callbacks only receive actual operations.
pub const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Iterate over all operations in the document, calling
/// `f(path, method, operation_map, path_item_map)` in declaration order.
pub fn for_each_operation(doc: &Value, mut f: impl FnMut(&str, &str, &Mapping, &Mapping)) {
    let Some(paths) = doc
        .as_mapping()
        .and_then(|m| m.get("paths"))
        .and_then(Value::as_mapping)
    else {
        return;
    };

    for (path_key, path_item) in paths {
        let Some(path_str) = path_key.as_str() else {
            continue;
        };
        let Some(path_map) = path_item.as_mapping() else {
            continue;
        };

        for (method_key, operation) in path_map {
            let method_str = method_key.as_str().unwrap_or_default();
            if !HTTP_METHODS.contains(&method_str) {
                continue;
            }
            let Some(op_map) = operation.as_mapping() else {
                continue;
            };
            f(path_str, method_str, op_map, path_map);
        }
    }
}

/// Follow a chain of mapping keys from `value`.
pub fn get_in<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .try_fold(value, |current, key| current.as_mapping()?.get(*key))
}

/// Render a scalar key or value as a string.
///
/// Unquoted YAML keys like `200:` or `swagger: 2.0` parse as numbers; callers
/// want their textual form.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Deep copy of `value` with every scalar mapping key rendered as a string.
///
/// `200:` and `'200':` name the same response; comparing normalized nodes
/// makes such quoting differences invisible.
pub fn normalize_keys(value: &Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.iter()
                .map(|(k, v)| {
                    let key = scalar_to_string(k).map_or_else(|| k.clone(), Value::String);
                    (key, normalize_keys(v))
                })
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(items.iter().map(normalize_keys).collect()),
        Value::Tagged(tagged) => Value::Tagged(Box::new(TaggedValue {
            tag: tagged.tag.clone(),
            value: normalize_keys(&tagged.value),
        })),
        other => other.clone(),
    }
}

/// Trailing name component of a `$ref` (`#/definitions/Pet` → `Pet`).
pub fn ref_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// The `$ref` string of a mapping node, if it is a reference.
pub fn ref_of(value: &Value) -> Option<&str> {
    value.as_mapping()?.get("$ref")?.as_str()
}

/// Resolve a possibly-`$ref` node against the section at `section` of `doc`.
///
/// Non-reference nodes are returned as-is. References are matched by their
/// trailing name; unresolvable references yield `None`.
pub fn resolve_node<'a>(doc: &'a Value, section: &[&str], node: &'a Value) -> Option<&'a Value> {
    match ref_of(node) {
        Some(reference) => get_in(doc, section)?
            .as_mapping()?
            .get(ref_name(reference)),
        None => Some(node),
    }
}

/// Whether a media type key denotes a JSON-compatible representation.
pub fn is_json_media_type(media_type: &str) -> bool {
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}
