//! Projection of vendor payload nodes into typed datum properties.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::warn;
use rust_decimal::Decimal;
use serde_json::Value;

use gridflux_telemetry::errors::TelemetryError;
use gridflux_telemetry::expr::{ExpressionService, ResultKind};
use gridflux_telemetry::models::{Datum, PropertyKind, PropertyMapping};

/// Name under which the extracted raw value is exposed to a converting
/// expression's variable context.
pub const RAW_VALUE_VARIABLE: &str = "value";

/// Project one payload node into a datum.
///
/// Each mapping extracts a raw value at its path and optionally derives the
/// final value through a converting expression, evaluated against the same
/// payload root with the raw value added to the ambient variables as
/// [`RAW_VALUE_VARIABLE`].
///
/// Evaluation and conversion failures are per-property: they are returned
/// alongside the datum and the remaining mappings still run. A mapping
/// whose source text does not even compile is configuration-scoped and
/// fails the whole projection - every later node would hit it too.
pub fn project_datum(
    timestamp: DateTime<Utc>,
    source_id: &str,
    root: &Value,
    mappings: &[PropertyMapping],
    variables: &BTreeMap<String, Value>,
    expressions: &ExpressionService,
) -> Result<(Datum, Vec<TelemetryError>), TelemetryError> {
    let mut datum = Datum::new(timestamp, source_id);
    let mut errors = Vec::new();

    for mapping in mappings {
        let expected = match mapping.kind {
            PropertyKind::Status => ResultKind::Text,
            _ => ResultKind::Number,
        };

        let compiled = expressions.compile(&mapping.path)?;
        let raw = match expressions.evaluate(compiled.as_ref(), root, variables, expected) {
            Ok(value) => value,
            Err(err) => {
                warn!("property '{}' skipped: {err}", mapping.property);
                errors.push(err);
                continue;
            }
        };

        let value = match &mapping.expression {
            None => raw,
            Some(source) => {
                let compiled = expressions.compile(source)?;
                let mut scoped = variables.clone();
                scoped.insert(RAW_VALUE_VARIABLE.to_string(), raw);
                match expressions.evaluate(compiled.as_ref(), root, &scoped, expected) {
                    Ok(value) => value,
                    Err(err) => {
                        warn!("property '{}' skipped: {err}", mapping.property);
                        errors.push(err);
                        continue;
                    }
                }
            }
        };

        let outcome = match mapping.kind {
            PropertyKind::Instantaneous => {
                to_decimal(&value).map(|d| datum.set_instantaneous(&mapping.property, d))
            }
            PropertyKind::Accumulating => {
                to_decimal(&value).map(|d| datum.set_accumulating(&mapping.property, d))
            }
            PropertyKind::Status => {
                to_text(&value).map(|s| datum.set_status(&mapping.property, s))
            }
        };
        if let Err(err) = outcome {
            warn!("property '{}' skipped: {err}", mapping.property);
            errors.push(err);
        }
    }

    Ok((datum, errors))
}

fn to_decimal(value: &Value) -> Result<Decimal, TelemetryError> {
    let parsed = match value {
        Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| TelemetryError::ExpressionEvaluation {
        message: format!("value {value} is not numeric"),
    })
}

fn to_text(value: &Value) -> Result<String, TelemetryError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(TelemetryError::ExpressionEvaluation {
            message: format!("value {other} is not textual"),
        }),
    }
}
