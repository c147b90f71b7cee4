//! A small embedded expression language for auto-quarantine triggers.
//!
//! Predicates are parsed once, at trigger-installation time, into a tagged
//! AST ([`ast::Expr`]); evaluation walks that tree against a fact bundle.
//! A predicate that fails to parse never becomes a [`CompiledPredicate`]
//! — [`crate::trigger::AutoQuarantineTrigger::new`] disables the trigger
//! instead of aborting the whole set.

mod ast;
mod eval;
mod lexer;
mod parser;
mod value;

use crate::facts::WorkloadFacts;

/// A compile- or evaluation-time predicate failure. Callers in this crate
/// only ever see this as "skip the trigger" — it is never surfaced to a
/// [`crate::manager`] caller (spec §7: "classification errors are
/// suppressed").
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct PredicateError(pub String);

/// A predicate pre-compiled from source text.
#[derive(Debug, Clone)]
pub struct CompiledPredicate {
    source: String,
    expr: ast::Expr,
}

impl CompiledPredicate {
    /// Parse `source` into an AST. Returns an error rather than panicking
    /// on malformed input — the caller disables the trigger instead.
    pub fn compile(source: impl Into<String>) -> Result<Self, PredicateError> {
        let source = source.into();
        let expr = parser::parse(&source)?;
        Ok(Self { source, expr })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate against a fact snapshot. An unknown identifier, a missing
    /// metadata key, or a type mismatch all surface here as an error;
    /// the classifier treats any such error as a non-match.
    pub fn evaluate(&self, facts: &WorkloadFacts) -> Result<bool, PredicateError> {
        eval::eval_bool(&self.expr, facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_rejects_malformed_source() {
        assert!(CompiledPredicate::compile("cpu >>> 8000").is_err());
    }

    #[test]
    fn compile_then_evaluate() {
        let pred = CompiledPredicate::compile("cpu > 8000").unwrap();
        let facts = WorkloadFacts::new("w1", "blaze").with_cpu(9000.0);
        assert!(pred.evaluate(&facts).unwrap());
    }
}
