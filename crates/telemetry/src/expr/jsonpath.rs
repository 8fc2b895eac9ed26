//! Bundled expression evaluator over JSONPath.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use jsonpath_rust::JsonPath;
use serde_json::Value;

use crate::errors::TelemetryError;

use super::{CompiledExpression, ExpressionEvaluator, ResultKind};

/// A compiled JSONPath.
pub struct JsonPathExpression {
    source_hash: String,
    path: JsonPath,
}

impl CompiledExpression for JsonPathExpression {
    fn source_hash(&self) -> &str {
        &self.source_hash
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Evaluator that treats expression source as a JSONPath into the payload
/// and yields the first match.
///
/// JSONPath has no variable references, so the ambient variable map is
/// ignored here; hosts needing parameterized expressions inject a richer
/// evaluator through the same trait.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonPathEvaluator;

impl JsonPathEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl ExpressionEvaluator for JsonPathEvaluator {
    fn parse(&self, source: &str) -> Result<Arc<dyn CompiledExpression>, TelemetryError> {
        let path = JsonPath::try_from(source).map_err(|e| TelemetryError::ExpressionParse {
            message: format!("invalid JSONPath '{source}': {e}"),
        })?;
        Ok(Arc::new(JsonPathExpression {
            source_hash: super::cache::content_key(source),
            path,
        }))
    }

    fn evaluate(
        &self,
        compiled: &dyn CompiledExpression,
        root: &Value,
        _variables: &BTreeMap<String, Value>,
        expected: ResultKind,
    ) -> Result<Value, TelemetryError> {
        let expression = compiled
            .as_any()
            .downcast_ref::<JsonPathExpression>()
            .ok_or_else(|| TelemetryError::ExpressionEvaluation {
                message: "expression was compiled by a different evaluator".to_string(),
            })?;

        let found = expression.path.find(root);
        let value = first_match(found).ok_or_else(|| TelemetryError::ExpressionEvaluation {
            message: "no value at path".to_string(),
        })?;

        check_kind(&value, expected)?;
        Ok(value)
    }
}

fn first_match(found: Value) -> Option<Value> {
    match found {
        Value::Null => None,
        Value::Array(mut matches) => {
            if matches.is_empty() {
                None
            } else {
                Some(matches.swap_remove(0))
            }
        }
        other => Some(other),
    }
}

fn check_kind(value: &Value, expected: ResultKind) -> Result<(), TelemetryError> {
    let ok = match expected {
        ResultKind::Json => true,
        ResultKind::Number => {
            value.is_number()
                || value
                    .as_str()
                    .is_some_and(|s| s.trim().parse::<f64>().is_ok())
        }
        ResultKind::Text => value.is_string() || value.is_number() || value.is_boolean(),
        ResultKind::Boolean => {
            value.is_boolean() || value.as_str().is_some_and(|s| s.parse::<bool>().is_ok())
        }
    };

    if ok {
        Ok(())
    } else {
        Err(TelemetryError::ExpressionEvaluation {
            message: format!("value {value} does not satisfy expected kind {expected:?}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars() -> BTreeMap<String, Value> {
        BTreeMap::new()
    }

    #[test]
    fn test_parse_rejects_malformed_path() {
        let evaluator = JsonPathEvaluator::new();
        assert!(matches!(
            evaluator.parse("$..[unclosed"),
            Err(TelemetryError::ExpressionParse { .. })
        ));
    }

    #[test]
    fn test_evaluate_extracts_first_match() {
        let evaluator = JsonPathEvaluator::new();
        let compiled = evaluator.parse("$.power").unwrap();
        let root = json!({"power": 1520.5, "mode": "exporting"});

        let value = evaluator
            .evaluate(compiled.as_ref(), &root, &vars(), ResultKind::Number)
            .unwrap();
        assert_eq!(value, json!(1520.5));
    }

    #[test]
    fn test_evaluate_accepts_numeric_strings_for_number_kind() {
        let evaluator = JsonPathEvaluator::new();
        let compiled = evaluator.parse("$.reading").unwrap();
        let root = json!({"reading": "88210.25"});

        let value = evaluator
            .evaluate(compiled.as_ref(), &root, &vars(), ResultKind::Number)
            .unwrap();
        assert_eq!(value, json!("88210.25"));
    }

    #[test]
    fn test_evaluate_missing_field_is_evaluation_error() {
        let evaluator = JsonPathEvaluator::new();
        let compiled = evaluator.parse("$.missing").unwrap();
        let root = json!({"power": 1});

        assert!(matches!(
            evaluator.evaluate(compiled.as_ref(), &root, &vars(), ResultKind::Number),
            Err(TelemetryError::ExpressionEvaluation { .. })
        ));
    }

    #[test]
    fn test_evaluate_kind_mismatch_is_evaluation_error() {
        let evaluator = JsonPathEvaluator::new();
        let compiled = evaluator.parse("$.mode").unwrap();
        let root = json!({"mode": "exporting"});

        assert!(matches!(
            evaluator.evaluate(compiled.as_ref(), &root, &vars(), ResultKind::Number),
            Err(TelemetryError::ExpressionEvaluation { .. })
        ));
    }

    #[test]
    fn test_evaluate_nested_path() {
        let evaluator = JsonPathEvaluator::new();
        let compiled = evaluator.parse("$.inverter.ac.power").unwrap();
        let root = json!({"inverter": {"ac": {"power": 900}}});

        let value = evaluator
            .evaluate(compiled.as_ref(), &root, &vars(), ResultKind::Number)
            .unwrap();
        assert_eq!(value, json!(900));
    }
}
