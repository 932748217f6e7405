//! Default condition operators.
//!
//! All predicates compare resolved JSON values. Equality is deep value
//! equality; the collection operators require an array on the right and the
//! string operators require strings on both sides, erroring otherwise rather
//! than coercing to false.

use serde_json::Value;

use crate::condition::OperatorError;

pub fn equals(left: &Value, right: &Value) -> Result<bool, OperatorError> {
    Ok(left == right)
}

pub fn not_equals(left: &Value, right: &Value) -> Result<bool, OperatorError> {
    Ok(left != right)
}

pub fn is_in(left: &Value, right: &Value) -> Result<bool, OperatorError> {
    let list = right.as_array().ok_or(OperatorError::RightNotArray)?;
    Ok(list.iter().any(|item| item == left))
}

pub fn not_in(left: &Value, right: &Value) -> Result<bool, OperatorError> {
    let list = right.as_array().ok_or(OperatorError::RightNotArray)?;
    Ok(!list.iter().any(|item| item == left))
}

pub fn contains(left: &Value, right: &Value) -> Result<bool, OperatorError> {
    let (l, r) = both_strings(left, right)?;
    Ok(l.contains(r))
}

pub fn starts_with(left: &Value, right: &Value) -> Result<bool, OperatorError> {
    let (l, r) = both_strings(left, right)?;
    Ok(l.starts_with(r))
}

pub fn ends_with(left: &Value, right: &Value) -> Result<bool, OperatorError> {
    let (l, r) = both_strings(left, right)?;
    Ok(l.ends_with(r))
}

fn both_strings<'v>(left: &'v Value, right: &'v Value) -> Result<(&'v str, &'v str), OperatorError> {
    match (left.as_str(), right.as_str()) {
        (Some(l), Some(r)) => Ok((l, r)),
        _ => Err(OperatorError::NotStrings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equals_is_deep() {
        assert!(equals(&json!({"a": [1, 2]}), &json!({"a": [1, 2]})).unwrap());
        assert!(!equals(&json!("1"), &json!(1)).unwrap());
    }

    #[test]
    fn not_equals_negates() {
        assert!(not_equals(&json!("a"), &json!("b")).unwrap());
        assert!(!not_equals(&json!("a"), &json!("a")).unwrap());
    }

    #[test]
    fn is_in_finds_element() {
        assert!(is_in(&json!("b"), &json!(["a", "b"])).unwrap());
        assert!(!is_in(&json!("c"), &json!(["a", "b"])).unwrap());
    }

    #[test]
    fn is_in_requires_array_on_right() {
        assert_eq!(
            is_in(&json!("a"), &json!("not-a-list")).unwrap_err(),
            OperatorError::RightNotArray
        );
    }

    #[test]
    fn not_in_requires_array_on_right() {
        assert_eq!(
            not_in(&json!("a"), &json!(42)).unwrap_err(),
            OperatorError::RightNotArray
        );
    }

    #[test]
    fn not_in_is_true_when_absent() {
        assert!(not_in(&json!("c"), &json!(["a", "b"])).unwrap());
        assert!(!not_in(&json!("a"), &json!(["a", "b"])).unwrap());
    }

    #[test]
    fn string_operators_require_strings() {
        assert_eq!(
            contains(&json!(1), &json!("a")).unwrap_err(),
            OperatorError::NotStrings
        );
        assert_eq!(
            starts_with(&json!("a"), &json!(1)).unwrap_err(),
            OperatorError::NotStrings
        );
        assert_eq!(
            ends_with(&json!(null), &json!("a")).unwrap_err(),
            OperatorError::NotStrings
        );
    }

    #[test]
    fn substring_prefix_suffix() {
        assert!(contains(&json!("refs/heads/main"), &json!("heads")).unwrap());
        assert!(starts_with(&json!("refs/heads/main"), &json!("refs/")).unwrap());
        assert!(ends_with(&json!("refs/heads/main"), &json!("/main")).unwrap());
    }
}
