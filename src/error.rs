//! Error types for random-variable construction, evaluation and sampling.
//!
//! Every failure is returned to the caller as an [`RvError`]; nothing in the
//! library logs and aborts on its own. Callers that want diagnostics can
//! route an error through [`RvError::log`], which picks the log level from
//! [`RvError::severity`].

use thiserror::Error;

/// How serious an error is for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// The result is usable but a limitation applies.
    Warning,
    /// The operation failed; the distribution itself is still valid.
    Error,
    /// A construction invariant was violated; no valid object exists.
    Fatal,
}

/// Error type for random-variable operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RvError {
    /// Invalid parameters at construction time.
    #[error("construction error: {0}")]
    Construction(String),

    /// Argument outside the domain of the operation.
    #[error("domain error: {0}")]
    Domain(String),

    /// Operation not meaningful for this kind of distribution.
    #[error("unsupported operation: {operation} is not defined for {distribution}")]
    Unsupported {
        operation: &'static str,
        distribution: String,
    },

    /// A generated sample fell outside the declared support.
    #[error("sampling error: value {value} outside support [{lower}, {upper}]")]
    Sampling { value: f64, lower: f64, upper: f64 },

    /// Division by zero in a derived statistic.
    #[error("division error: {0}")]
    Division(String),

    /// Numerical integration did not reach the requested tolerance.
    #[error(
        "quadrature did not converge after {subdivisions} subdivisions \
         (error estimate {error_estimate:e}, tolerance {tolerance:e})"
    )]
    Convergence {
        subdivisions: usize,
        error_estimate: f64,
        tolerance: f64,
    },
}

impl RvError {
    pub(crate) fn unsupported(operation: &'static str, distribution: impl Into<String>) -> Self {
        RvError::Unsupported {
            operation,
            distribution: distribution.into(),
        }
    }

    /// Severity of this error.
    pub fn severity(&self) -> Severity {
        match self {
            RvError::Construction(_) => Severity::Fatal,
            RvError::Convergence { .. } => Severity::Warning,
            RvError::Domain(_)
            | RvError::Unsupported { .. }
            | RvError::Sampling { .. }
            | RvError::Division(_) => Severity::Error,
        }
    }

    /// Emits this error through the `log` facade at a level matching its severity.
    pub fn log(&self) {
        match self.severity() {
            Severity::Warning => log::warn!("{self}"),
            Severity::Error | Severity::Fatal => log::error!("{self}"),
        }
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, RvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        assert_eq!(
            RvError::Construction("l > u".into()).severity(),
            Severity::Fatal
        );
        assert_eq!(RvError::Division("zero mean".into()).severity(), Severity::Error);
        assert_eq!(
            RvError::Convergence {
                subdivisions: 10,
                error_estimate: 1e-3,
                tolerance: 1e-10
            }
            .severity(),
            Severity::Warning
        );
        assert!(Severity::Fatal > Severity::Error);
    }

    #[test]
    fn test_display_includes_context() {
        let e = RvError::unsupported("pdf", "SumOfIndependent");
        assert_eq!(
            e.to_string(),
            "unsupported operation: pdf is not defined for SumOfIndependent"
        );

        let e = RvError::Sampling {
            value: 11.0,
            lower: 1.0,
            upper: 10.0,
        };
        assert!(e.to_string().contains("11"));
    }
}
