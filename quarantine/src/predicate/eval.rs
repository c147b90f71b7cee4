//! Walks a compiled [`Expr`] against a [`WorkloadFacts`] snapshot.

use super::PredicateError;
use super::ast::{CompareOp, Expr};
use super::value::Value;
use crate::facts::WorkloadFacts;

pub fn eval(expr: &Expr, facts: &WorkloadFacts) -> Result<Value, PredicateError> {
    match expr {
        Expr::Literal(v) => Ok(v.clone()),
        Expr::Var(name) => resolve_var(name, facts),
        Expr::Index { base, key } => {
            if base != "metadata" {
                return Err(PredicateError(format!(
                    "'{}' cannot be indexed, only 'metadata' supports [\"key\"]",
                    base
                )));
            }
            facts
                .metadata
                .get(key)
                .cloned()
                .map(Value::Str)
                .ok_or_else(|| PredicateError(format!("metadata key '{}' is not present", key)))
        }
        Expr::Compare { left, op, right } => {
            let l = eval(left, facts)?;
            let r = eval(right, facts)?;
            Ok(Value::Bool(compare(&l, *op, &r)?))
        }
        Expr::And(a, b) => {
            let l = as_bool(&eval(a, facts)?)?;
            if !l {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(as_bool(&eval(b, facts)?)?))
        }
        Expr::Or(a, b) => {
            let l = as_bool(&eval(a, facts)?)?;
            if l {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(as_bool(&eval(b, facts)?)?))
        }
        Expr::Not(inner) => Ok(Value::Bool(!as_bool(&eval(inner, facts)?)?)),
    }
}

/// Entry point used by the classifier: a predicate's truth value.
pub fn eval_bool(expr: &Expr, facts: &WorkloadFacts) -> Result<bool, PredicateError> {
    as_bool(&eval(expr, facts)?)
}

fn resolve_var(name: &str, facts: &WorkloadFacts) -> Result<Value, PredicateError> {
    match name {
        "cpu" => Ok(Value::Number(facts.cpu)),
        "mem" => Ok(Value::Number(facts.mem)),
        "template" => Ok(Value::Str(facts.template.clone())),
        "network_egress" => facts
            .network_egress
            .map(Value::Number)
            .ok_or_else(|| PredicateError("network_egress is not present in facts".to_string())),
        "network_ingress" => facts
            .network_ingress
            .map(Value::Number)
            .ok_or_else(|| PredicateError("network_ingress is not present in facts".to_string())),
        "metadata" => Err(PredicateError(
            "'metadata' must be indexed, e.g. metadata[\"key\"]".to_string(),
        )),
        other => Err(PredicateError(format!("unknown identifier '{}'", other))),
    }
}

fn as_bool(v: &Value) -> Result<bool, PredicateError> {
    match v {
        Value::Bool(b) => Ok(*b),
        other => Err(PredicateError(format!(
            "expected bool, found {} ({})",
            other.type_name(),
            other
        ))),
    }
}

fn compare(l: &Value, op: CompareOp, r: &Value) -> Result<bool, PredicateError> {
    match (l, r) {
        (Value::Number(a), Value::Number(b)) => Ok(match op {
            CompareOp::Gt => a > b,
            CompareOp::Lt => a < b,
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
        }),
        (Value::Str(a), Value::Str(b)) => match op {
            CompareOp::Eq => Ok(a == b),
            CompareOp::Ne => Ok(a != b),
            _ => Err(PredicateError(
                "strings only support == and != comparisons".to_string(),
            )),
        },
        (Value::Bool(a), Value::Bool(b)) => match op {
            CompareOp::Eq => Ok(a == b),
            CompareOp::Ne => Ok(a != b),
            _ => Err(PredicateError(
                "bools only support == and != comparisons".to_string(),
            )),
        },
        (a, b) => Err(PredicateError(format!(
            "cannot compare {} with {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::parser::parse;

    fn facts() -> WorkloadFacts {
        WorkloadFacts::new("w1", "blaze")
    }

    #[test]
    fn numeric_comparison() {
        let expr = parse("cpu > 8000").unwrap();
        let mut f = facts();
        f.cpu = 9000.0;
        assert!(eval_bool(&expr, &f).unwrap());
    }

    #[test]
    fn missing_metadata_key_is_an_eval_error() {
        let expr = parse(r#"metadata["untrusted"] == "true""#).unwrap();
        let f = facts();
        assert!(eval_bool(&expr, &f).is_err());
    }

    #[test]
    fn unknown_identifier_is_an_eval_error() {
        let expr = parse("bogus > 1").unwrap();
        assert!(eval_bool(&expr, &facts()).is_err());
    }

    #[test]
    fn logical_and_short_circuits() {
        let expr = parse(r#"cpu > 8000 && mem > 100"#).unwrap();
        let mut f = facts();
        f.cpu = 9000.0;
        f.mem = 200.0;
        assert!(eval_bool(&expr, &f).unwrap());
        f.mem = 1.0;
        assert!(!eval_bool(&expr, &f).unwrap());
    }
}
