//! Path resolution over nested JSON values.
//!
//! # Responsibilities
//! - Walk dotted paths (e.g. `commits[0].author.name`) through a JSON body
//! - Index into arrays with `key[N]`
//! - Project a sub-path across every array element with `key[]`
//!
//! # Design Decisions
//! - Hard failure on missing keys, type mismatches and out-of-bounds indexes
//! - Lenient inside projection: elements that fail to resolve are skipped
//! - Projection flattens one level of per-element array results and ends the walk

use serde_json::Value;
use thiserror::Error;

/// Errors produced while navigating a path through a JSON value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("expected object at '{segment}'")]
    ExpectedObject { segment: String },

    #[error("key '{key}' not found")]
    KeyNotFound { key: String },

    #[error("expected array at '{key}'")]
    ExpectedArray { key: String },

    #[error("index out of bounds at '{key}[{index}]'")]
    IndexOutOfBounds { key: String, index: i64 },
}

/// How a single path segment accesses the value it names.
enum Access {
    Plain,
    Index(i64),
    Project,
}

struct Segment<'a> {
    key: &'a str,
    access: Access,
}

/// Resolves dotted paths against JSON bodies.
///
/// Stateless; one instance is shared read-only across all requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathResolver;

impl PathResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a value by navigating `path` through `data`
    /// (e.g. `users[0].name` or `users[].name`).
    pub fn resolve(&self, path: &str, data: &Value) -> Result<Value, ResolveError> {
        let segments: Vec<&str> = path.split('.').collect();
        resolve_segments(data, &segments)
    }
}

fn resolve_segments(data: &Value, segments: &[&str]) -> Result<Value, ResolveError> {
    let mut current = data;

    for (i, raw) in segments.iter().enumerate() {
        let segment = parse_segment(raw);

        let map = current.as_object().ok_or_else(|| ResolveError::ExpectedObject {
            segment: raw.to_string(),
        })?;

        let value = map.get(segment.key).ok_or_else(|| ResolveError::KeyNotFound {
            key: segment.key.to_string(),
        })?;

        match segment.access {
            Access::Plain => {
                current = value;
            }
            Access::Index(index) => {
                let array = value.as_array().ok_or_else(|| ResolveError::ExpectedArray {
                    key: segment.key.to_string(),
                })?;
                if index < 0 || index as usize >= array.len() {
                    return Err(ResolveError::IndexOutOfBounds {
                        key: segment.key.to_string(),
                        index,
                    });
                }
                current = &array[index as usize];
            }
            Access::Project => {
                let array = value.as_array().ok_or_else(|| ResolveError::ExpectedArray {
                    key: segment.key.to_string(),
                })?;
                return Ok(project(array, &segments[i + 1..]));
            }
        }
    }

    Ok(current.clone())
}

/// Resolve the remaining segments against each array element independently.
/// Elements that fail to resolve are skipped; per-element array results are
/// flattened one level.
fn project(array: &[Value], remaining: &[&str]) -> Value {
    let mut results = Vec::with_capacity(array.len());
    for item in array {
        match resolve_segments(item, remaining) {
            Ok(Value::Array(items)) => results.extend(items),
            Ok(value) => results.push(value),
            Err(_) => continue,
        }
    }
    Value::Array(results)
}

/// Parse a segment like `users[0]` or `users[]` into its key and access mode.
/// Malformed brackets (no closing bracket, non-numeric index) degrade to a
/// plain key lookup of the whole segment text.
fn parse_segment(part: &str) -> Segment<'_> {
    let plain = Segment {
        key: part,
        access: Access::Plain,
    };

    let (start, end) = match (part.find('['), part.find(']')) {
        (Some(s), Some(e)) if s < e => (s, e),
        _ => return plain,
    };

    let key = &part[..start];
    let index = &part[start + 1..end];

    if index.is_empty() {
        return Segment {
            key,
            access: Access::Project,
        };
    }

    match index.parse::<i64>() {
        Ok(i) => Segment {
            key,
            access: Access::Index(i),
        },
        Err(_) => plain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve(path: &str, data: &Value) -> Result<Value, ResolveError> {
        PathResolver::new().resolve(path, data)
    }

    #[test]
    fn resolves_scalar_key() {
        let data = json!({"status": "active"});
        assert_eq!(resolve("status", &data).unwrap(), json!("active"));
    }

    #[test]
    fn resolves_nested_path() {
        let data = json!({"commit": {"author": {"name": "ada"}}});
        assert_eq!(resolve("commit.author.name", &data).unwrap(), json!("ada"));
    }

    #[test]
    fn missing_key_fails() {
        let data = json!({"a": 1});
        assert_eq!(
            resolve("b", &data).unwrap_err(),
            ResolveError::KeyNotFound { key: "b".into() }
        );
    }

    #[test]
    fn non_object_cursor_fails() {
        let data = json!({"a": "scalar"});
        assert_eq!(
            resolve("a.b", &data).unwrap_err(),
            ResolveError::ExpectedObject { segment: "b".into() }
        );
    }

    #[test]
    fn resolves_array_index() {
        let data = json!({"users": [{"name": "a"}, {"name": "b"}]});
        assert_eq!(resolve("users[1].name", &data).unwrap(), json!("b"));
    }

    #[test]
    fn index_out_of_bounds_fails() {
        let data = json!({"a": ["x", "y"]});
        assert_eq!(
            resolve("a[2]", &data).unwrap_err(),
            ResolveError::IndexOutOfBounds { key: "a".into(), index: 2 }
        );
    }

    #[test]
    fn negative_index_fails() {
        let data = json!({"a": ["x"]});
        assert_eq!(
            resolve("a[-1]", &data).unwrap_err(),
            ResolveError::IndexOutOfBounds { key: "a".into(), index: -1 }
        );
    }

    #[test]
    fn indexing_a_non_array_fails() {
        let data = json!({"a": {"b": 1}});
        assert_eq!(
            resolve("a[0]", &data).unwrap_err(),
            ResolveError::ExpectedArray { key: "a".into() }
        );
    }

    #[test]
    fn projection_collects_field_across_elements() {
        let data = json!({"labels": [{"title": "bug"}, {"title": "urgent"}]});
        assert_eq!(
            resolve("labels[].title", &data).unwrap(),
            json!(["bug", "urgent"])
        );
    }

    #[test]
    fn projection_skips_failing_elements() {
        let data = json!({"labels": [{"title": "bug"}, "not-an-object", {"other": 1}]});
        assert_eq!(resolve("labels[].title", &data).unwrap(), json!(["bug"]));
    }

    #[test]
    fn projection_flattens_nested_arrays_one_level() {
        let data = json!({
            "groups": [
                {"tags": ["a", "b"]},
                {"tags": ["c"]}
            ]
        });
        assert_eq!(
            resolve("groups[].tags", &data).unwrap(),
            json!(["a", "b", "c"])
        );
    }

    #[test]
    fn trailing_projection_returns_elements() {
        let data = json!({"ids": [1, 2, 3]});
        assert_eq!(resolve("ids[]", &data).unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn projection_over_empty_array_is_empty() {
        let data = json!({"labels": []});
        assert_eq!(resolve("labels[].title", &data).unwrap(), json!([]));
    }

    #[test]
    fn malformed_index_degrades_to_plain_key() {
        let data = json!({"a[x]": "literal-key"});
        assert_eq!(resolve("a[x]", &data).unwrap(), json!("literal-key"));
    }
}
