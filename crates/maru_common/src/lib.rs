//! Maru common library
//!
//! Routes natural-language instructions to declared local operations: a
//! reasoning service picks the operation and its arguments, the dispatcher
//! validates that choice against the registry and runs it.

pub mod catalog;
pub mod config;
pub mod decision;
pub mod dispatcher;
pub mod error;
pub mod llm_client;
pub mod operations;
pub mod registry;
pub mod router;
pub mod schema;
pub mod value;

pub use catalog::Catalog;
pub use config::MaruConfig;
pub use decision::{Decision, DecisionRequester, Provenance};
pub use dispatcher::{Dispatcher, ExecutionResult};
pub use error::{ConfigError, DispatchError, ErrorKind, OperationFailure};
pub use llm_client::{HttpReasoningClient, LlmConfig, LlmError, ReasoningClient, ScriptedClient};
pub use operations::builtin_registry;
pub use registry::{Operation, Registry};
pub use router::{IntentRouter, RouteOutcome};
pub use schema::{OperationSpec, ParamSpec, ParamType};
pub use value::{ArgValue, Arguments};
