//! Page attribute expressions.
//!
//! A page reference may name several alternatives separated by commas, and
//! each alternative may interpolate `${name}` variables:
//!
//! ```text
//! page-${platform}.html, page.html
//! ```

use std::collections::HashMap;

use thiserror::Error;

/// Error type for expression evaluation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    /// The expression refers to a variable that was never defined.
    #[error("Undefined variable '{0}'")]
    UndefinedVariable(String),

    /// A `${` was not closed.
    #[error("Unterminated variable in '{0}'")]
    Unterminated(String),
}

/// Expands a page reference into identifiers to try, in priority order.
pub trait CandidateEvaluator: Send + Sync {
    /// Evaluates `reference` into candidate identifiers.
    fn evaluate(&self, reference: &str) -> Result<Vec<String>, ExpressionError>;
}

impl<F> CandidateEvaluator for F
where
    F: Fn(&str) -> Result<Vec<String>, ExpressionError> + Send + Sync,
{
    fn evaluate(&self, reference: &str) -> Result<Vec<String>, ExpressionError> {
        self(reference)
    }
}

/// Default evaluator: comma-separated alternatives with `${name}` variables.
#[derive(Debug, Clone, Default)]
pub struct PageAttributeExpression {
    variables: HashMap<String, String>,
}

impl PageAttributeExpression {
    /// Creates an evaluator without variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an evaluator with the given variables.
    pub fn with_variables(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }

    /// Defines or replaces a variable.
    pub fn define_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Returns the value of a variable.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    fn interpolate(&self, part: &str) -> Result<String, ExpressionError> {
        let mut out = String::with_capacity(part.len());
        let mut rest = part;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find('}')
                .ok_or_else(|| ExpressionError::Unterminated(part.to_string()))?;
            let name = after[..end].trim();
            let value = self
                .variables
                .get(name)
                .ok_or_else(|| ExpressionError::UndefinedVariable(name.to_string()))?;
            out.push_str(value);
            rest = &after[end + 1..];
        }
        out.push_str(rest);

        Ok(out)
    }
}

impl CandidateEvaluator for PageAttributeExpression {
    fn evaluate(&self, reference: &str) -> Result<Vec<String>, ExpressionError> {
        reference
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| self.interpolate(part))
            .collect()
    }
}
