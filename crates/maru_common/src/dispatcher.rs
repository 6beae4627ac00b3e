//! Dispatcher
//!
//! Validates a [`Decision`] against the registry and runs the operation.
//!
//! Validation order:
//! 1. operation is registered
//! 2. every required parameter is present
//! 3. every present argument has its declared type
//! 4. enumerated parameters hold an allowed value
//! 5. no argument outside the declared parameters
//!
//! Whatever the implementation does wrong (an error or a panic) comes back
//! as [`DispatchError::OperationExecution`].

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{info, warn};

use crate::decision::Decision;
use crate::error::DispatchError;
use crate::registry::Registry;
use crate::schema::OperationSpec;
use crate::value::{ArgValue, Arguments};

/// Result of executing one decision
pub type ExecutionResult = Result<String, DispatchError>;

pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn execute(&self, decision: &Decision) -> ExecutionResult {
        let result = self.run(decision);
        match &result {
            Ok(_) => info!(
                request_id = %decision.provenance.request_id,
                "Executed {}",
                decision.operation
            ),
            Err(e) => warn!(
                request_id = %decision.provenance.request_id,
                kind = %e.kind(),
                "Dispatch of {} failed: {}",
                decision.operation,
                e
            ),
        }
        result
    }

    fn run(&self, decision: &Decision) -> ExecutionResult {
        let entry = self.registry.lookup(&decision.operation)?;
        validate(&entry.spec, &decision.arguments)?;

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            entry.implementation.invoke(&decision.arguments)
        }));

        match outcome {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(failure)) => Err(DispatchError::OperationExecution {
                operation: decision.operation.clone(),
                message: failure.to_string(),
            }),
            Err(panic) => Err(DispatchError::OperationExecution {
                operation: decision.operation.clone(),
                message: panic_message(panic.as_ref()),
            }),
        }
    }
}

/// Check arguments against a spec (steps 2-5 above)
pub fn validate(spec: &OperationSpec, args: &Arguments) -> Result<(), DispatchError> {
    if let Some(missing) = spec.required_params().find(|p| !args.contains(&p.name)) {
        return Err(DispatchError::MissingArgument {
            parameter: missing.name.clone(),
        });
    }

    for param in &spec.params {
        if let Some(value) = args.get(&param.name) {
            if value.param_type() != param.ty {
                return Err(DispatchError::TypeMismatch {
                    parameter: param.name.clone(),
                    expected: param.ty.to_string(),
                });
            }
        }
    }

    for param in &spec.params {
        if let (Some(value), Some(allowed)) = (args.get(&param.name), &param.allowed) {
            if !allowed.contains(value) {
                return Err(DispatchError::InvalidEnumValue {
                    parameter: param.name.clone(),
                    value: value.to_string(),
                    allowed: allowed
                        .iter()
                        .map(ArgValue::to_string)
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }
        }
    }

    if let Some((name, _)) = args.iter().find(|(name, _)| spec.find_param(name).is_none()) {
        return Err(DispatchError::UnexpectedArgument {
            parameter: name.to_string(),
        });
    }

    Ok(())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "operation panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OperationFailure;
    use crate::schema::ParamSpec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn calc_spec() -> OperationSpec {
        OperationSpec::new("calc", "calc")
            .param(ParamSpec::string("operation", "op").one_of(["더하기", "나누기"]))
            .param(ParamSpec::number("a", "a"))
            .param(ParamSpec::number("b", "b"))
            .param(ParamSpec::boolean("verbose", "v").optional())
    }

    fn good_args() -> Arguments {
        Arguments::new()
            .with("operation", "더하기")
            .with("a", 1)
            .with("b", 2)
    }

    #[test]
    fn test_validate_accepts_good_args() {
        assert!(validate(&calc_spec(), &good_args()).is_ok());
        assert!(validate(&calc_spec(), &good_args().with("verbose", true)).is_ok());
    }

    #[test]
    fn test_validate_missing() {
        let args = Arguments::new().with("operation", "더하기").with("a", 1);
        assert_eq!(
            validate(&calc_spec(), &args),
            Err(DispatchError::MissingArgument {
                parameter: "b".to_string()
            })
        );
    }

    #[test]
    fn test_validate_type_mismatch() {
        let args = good_args().with("a", "one");
        assert_eq!(
            validate(&calc_spec(), &args),
            Err(DispatchError::TypeMismatch {
                parameter: "a".to_string(),
                expected: "number".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_enum() {
        let args = good_args().with("operation", "제곱");
        let err = validate(&calc_spec(), &args).unwrap_err();
        assert_eq!(err.parameter(), Some("operation"));
        assert_eq!(
            err,
            DispatchError::InvalidEnumValue {
                parameter: "operation".to_string(),
                value: "\"제곱\"".to_string(),
                allowed: "\"더하기\", \"나누기\"".to_string(),
            }
        );
    }

    #[test]
    fn test_validate_unexpected() {
        let args = good_args().with("c", 3);
        assert_eq!(
            validate(&calc_spec(), &args),
            Err(DispatchError::UnexpectedArgument {
                parameter: "c".to_string()
            })
        );
    }

    #[test]
    fn test_missing_checked_before_type() {
        // "a" has the wrong type and "b" is missing: missing wins
        let args = Arguments::new().with("operation", "더하기").with("a", "x");
        assert!(matches!(
            validate(&calc_spec(), &args),
            Err(DispatchError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_type_checked_before_enum() {
        let args = good_args().with("operation", 3);
        assert!(matches!(
            validate(&calc_spec(), &args),
            Err(DispatchError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_operation_does_not_invoke() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut registry = Registry::new();
        registry
            .register(
                OperationSpec::new("count", "counts"),
                move |_: &Arguments| -> Result<String, OperationFailure> {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok("counted".to_string())
                },
            )
            .unwrap();
        let dispatcher = Dispatcher::new(Arc::new(registry));

        let err = dispatcher
            .execute(&Decision::new("missing", Arguments::new()))
            .unwrap_err();
        assert_eq!(err, DispatchError::UnknownOperation("missing".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(
            dispatcher.execute(&Decision::new("count", Arguments::new())),
            Ok("counted".to_string())
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_and_panic_are_wrapped() {
        let mut registry = Registry::new();
        registry
            .register(
                OperationSpec::new("fails", "always fails"),
                |_: &Arguments| -> Result<String, OperationFailure> {
                    Err(OperationFailure::new("backend unavailable"))
                },
            )
            .unwrap();
        registry
            .register(
                OperationSpec::new("panics", "always panics"),
                |_: &Arguments| -> Result<String, OperationFailure> { panic!("boom") },
            )
            .unwrap();
        let dispatcher = Dispatcher::new(Arc::new(registry));

        assert_eq!(
            dispatcher.execute(&Decision::new("fails", Arguments::new())),
            Err(DispatchError::OperationExecution {
                operation: "fails".to_string(),
                message: "backend unavailable".to_string(),
            })
        );
        assert_eq!(
            dispatcher.execute(&Decision::new("panics", Arguments::new())),
            Err(DispatchError::OperationExecution {
                operation: "panics".to_string(),
                message: "boom".to_string(),
            })
        );
    }
}
