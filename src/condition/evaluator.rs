//! Condition string evaluation against inbound headers and body.

use axum::http::HeaderMap;
use serde_json::Value;
use thiserror::Error;

use crate::condition::operators;
use crate::resolver::{PathResolver, ResolveError};

/// A binary predicate over two resolved operand values.
pub type OperatorFn = Box<dyn Fn(&Value, &Value) -> Result<bool, OperatorError> + Send + Sync>;

/// Errors produced by an operator predicate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OperatorError {
    #[error("right side must be an array")]
    RightNotArray,

    #[error("both sides must be strings")]
    NotStrings,

    /// Escape hatch for operators registered at runtime.
    #[error("{0}")]
    Other(String),
}

/// Errors produced while evaluating a single condition.
#[derive(Debug, Error)]
pub enum ConditionError {
    #[error("unsupported operator in: {0}")]
    UnsupportedOperator(String),

    #[error("left value: {0}")]
    LeftOperand(#[source] ResolveError),

    #[error("right value: {0}")]
    RightOperand(#[source] ResolveError),

    #[error("operator {op}: {source}")]
    Operator {
        op: String,
        #[source]
        source: OperatorError,
    },
}

/// Evaluates condition strings of the form `<operand> <token> <operand>`.
///
/// Operators live in an ordered registry; the first registered token found as a
/// substring of the condition splits it into its two operands.
pub struct Evaluator {
    operators: Vec<(String, OperatorFn)>,
    resolver: PathResolver,
}

impl Evaluator {
    /// An evaluator with an empty operator registry.
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            operators: Vec::new(),
            resolver,
        }
    }

    /// An evaluator with the default operator set:
    /// `{eq}`, `{ne}`, `{in}`, `{notIn}`, `{contains}`, `{startsWith}`, `{endsWith}`.
    pub fn with_defaults(resolver: PathResolver) -> Self {
        Self::new(resolver)
            .register("{eq}", Box::new(|l, r| operators::equals(l, r)))
            .register("{ne}", Box::new(|l, r| operators::not_equals(l, r)))
            .register("{in}", Box::new(|l, r| operators::is_in(l, r)))
            .register("{notIn}", Box::new(|l, r| operators::not_in(l, r)))
            .register("{contains}", Box::new(|l, r| operators::contains(l, r)))
            .register("{startsWith}", Box::new(|l, r| operators::starts_with(l, r)))
            .register("{endsWith}", Box::new(|l, r| operators::ends_with(l, r)))
    }

    /// Register an operator. Re-registering a token replaces its predicate in
    /// place, keeping the original scan position.
    pub fn register(mut self, token: impl Into<String>, op: OperatorFn) -> Self {
        let token = token.into();
        match self.operators.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = op,
            None => self.operators.push((token, op)),
        }
        self
    }

    /// Evaluate every condition in order with fail-fast AND semantics.
    /// An empty list is vacuously true.
    pub fn evaluate_all(
        &self,
        conditions: &[String],
        headers: &HeaderMap,
        body: &Value,
    ) -> Result<bool, ConditionError> {
        for condition in conditions {
            if !self.evaluate_one(condition, headers, body)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn evaluate_one(
        &self,
        condition: &str,
        headers: &HeaderMap,
        body: &Value,
    ) -> Result<bool, ConditionError> {
        let (token, op, left_raw, right_raw) = self.split(condition)?;

        let left = self
            .resolve_operand(left_raw, headers, body)
            .map_err(ConditionError::LeftOperand)?;
        let right = self
            .resolve_operand(right_raw, headers, body)
            .map_err(ConditionError::RightOperand)?;

        op(&left, &right).map_err(|source| ConditionError::Operator {
            op: token.to_string(),
            source,
        })
    }

    /// Find the first registered token occurring in the condition and split
    /// around its first occurrence.
    fn split<'a, 'c>(
        &'a self,
        condition: &'c str,
    ) -> Result<(&'a str, &'a OperatorFn, &'c str, &'c str), ConditionError> {
        for (token, op) in &self.operators {
            if let Some(pos) = condition.find(token.as_str()) {
                let left = condition[..pos].trim();
                let right = condition[pos + token.len()..].trim();
                return Ok((token, op, left, right));
            }
        }
        Err(ConditionError::UnsupportedOperator(condition.to_string()))
    }

    /// Resolve an operand expression to a value: `Header.<name>` reads the
    /// first header value, `Body.<path>` delegates to the path resolver,
    /// anything else is a literal string.
    fn resolve_operand(
        &self,
        raw: &str,
        headers: &HeaderMap,
        body: &Value,
    ) -> Result<Value, ResolveError> {
        let expr = raw.trim_matches(|c| c == '{' || c == '}');

        if let Some(name) = expr.strip_prefix("Header.") {
            let value = headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            return Ok(Value::String(value.to_string()));
        }

        if let Some(path) = expr.strip_prefix("Body.") {
            return self.resolver.resolve(path, body);
        }

        Ok(Value::String(expr.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn evaluator() -> Evaluator {
        Evaluator::with_defaults(PathResolver::new())
    }

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(
                axum::http::HeaderName::from_bytes(k.as_bytes()).unwrap(),
                v.parse().unwrap(),
            );
        }
        map
    }

    fn conds(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_condition_list_is_vacuously_true() {
        let ok = evaluator()
            .evaluate_all(&[], &HeaderMap::new(), &json!({}))
            .unwrap();
        assert!(ok);
    }

    #[test]
    fn header_equals_literal() {
        let ok = evaluator()
            .evaluate_all(
                &conds(&["{Header.X-Custom} {eq} {active}"]),
                &headers(&[("X-Custom", "active")]),
                &json!({}),
            )
            .unwrap();
        assert!(ok);
    }

    #[test]
    fn header_vs_body_mismatch_is_false() {
        let ok = evaluator()
            .evaluate_all(
                &conds(&["{Header.X-Custom} {eq} {Body.status}"]),
                &headers(&[("X-Custom", "active")]),
                &json!({"status": "inactive"}),
            )
            .unwrap();
        assert!(!ok);
    }

    #[test]
    fn absent_header_resolves_to_empty_string() {
        let ok = evaluator()
            .evaluate_all(
                &conds(&["{Header.Missing} {eq} {}"]),
                &HeaderMap::new(),
                &json!({}),
            )
            .unwrap();
        assert!(ok);
    }

    #[test]
    fn body_path_error_propagates() {
        let err = evaluator()
            .evaluate_all(
                &conds(&["{Body.missing} {eq} {x}"]),
                &HeaderMap::new(),
                &json!({}),
            )
            .unwrap_err();
        assert!(matches!(err, ConditionError::LeftOperand(_)));
    }

    #[test]
    fn unsupported_operator_errors() {
        let err = evaluator()
            .evaluate_all(&conds(&["{a} {gt} {b}"]), &HeaderMap::new(), &json!({}))
            .unwrap_err();
        assert!(matches!(err, ConditionError::UnsupportedOperator(_)));
    }

    #[test]
    fn false_condition_short_circuits_the_rest() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let evaluator = evaluator().register(
            "{spy}",
            Box::new(move |_, _| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }),
        );

        let ok = evaluator
            .evaluate_all(
                &conds(&["{a} {eq} {b}", "{x} {spy} {y}"]),
                &HeaderMap::new(),
                &json!({}),
            )
            .unwrap();

        assert!(!ok);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn erroring_condition_short_circuits_the_rest() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let evaluator = evaluator().register(
            "{spy}",
            Box::new(move |_, _| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }),
        );

        let result = evaluator.evaluate_all(
            &conds(&["{a} {in} {b}", "{x} {spy} {y}"]),
            &HeaderMap::new(),
            &json!({}),
        );

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn in_matches_against_body_array() {
        let ok = evaluator()
            .evaluate_all(
                &conds(&["{bug} {in} {Body.labels[].title}"]),
                &HeaderMap::new(),
                &json!({"labels": [{"title": "bug"}, {"title": "urgent"}]}),
            )
            .unwrap();
        assert!(ok);
    }

    #[test]
    fn registration_replaces_existing_token_in_place() {
        let evaluator = evaluator().register("{eq}", Box::new(|_, _| Ok(false)));
        let ok = evaluator
            .evaluate_all(&conds(&["{a} {eq} {a}"]), &HeaderMap::new(), &json!({}))
            .unwrap();
        assert!(!ok);
    }

    #[test]
    fn first_registered_token_wins_the_scan() {
        // Both tokens occur textually; `{first}` was registered earlier so it
        // splits the condition.
        let evaluator = Evaluator::new(PathResolver::new())
            .register("{first}", Box::new(|l, _| Ok(l == &json!("a"))))
            .register("{second}", Box::new(|_, _| Ok(false)));

        let ok = evaluator
            .evaluate_all(
                &conds(&["a {first} b {second} c"]),
                &HeaderMap::new(),
                &json!({}),
            )
            .unwrap();
        assert!(ok);
    }
}
