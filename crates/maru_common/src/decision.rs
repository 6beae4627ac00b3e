//! Decision Requester
//!
//! Asks the reasoning service which declared operation fits an instruction
//! and turns its answer into a typed [`Decision`].
//!
//! When the service proposes several calls for one instruction only the first
//! one is used. The number of proposals is kept in the decision's provenance.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::DispatchError;
use crate::llm_client::{ReasoningClient, ServiceRequest, ToolCall};
use crate::schema::{declarations, OperationSpec};
use crate::value::{ArgValue, Arguments};

/// Where a decision came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provenance {
    pub request_id: String,
    pub model: String,
    /// How many calls the service proposed (only the first is used)
    pub candidates: usize,
    /// Argument payload exactly as the service returned it
    pub raw_arguments: String,
}

/// Operation chosen for one instruction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    #[serde(rename = "function")]
    pub operation: String,
    pub arguments: Arguments,
    pub provenance: Provenance,
}

impl Decision {
    /// Decision built locally, without a service round-trip
    pub fn new(operation: impl Into<String>, arguments: Arguments) -> Self {
        let arguments_json = arguments.to_json().to_string();
        Self {
            operation: operation.into(),
            arguments,
            provenance: Provenance {
                request_id: uuid::Uuid::new_v4().to_string(),
                model: "local".to_string(),
                candidates: 1,
                raw_arguments: arguments_json,
            },
        }
    }

    /// `{"function": .., "arguments": {..}}` view for display
    pub fn call_info(&self) -> serde_json::Value {
        serde_json::json!({
            "function": self.operation,
            "arguments": self.arguments.to_json(),
        })
    }
}

pub struct DecisionRequester<C> {
    client: C,
    system_prompt: String,
}

impl<C: ReasoningClient> DecisionRequester<C> {
    pub fn new(client: C, system_prompt: impl Into<String>) -> Self {
        Self {
            client,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Ask the service for a decision.
    ///
    /// `Ok(None)` means the service chose not to call anything; that is a
    /// normal outcome, not a failure.
    pub fn decide<'a, I>(
        &self,
        instruction: &str,
        specs: I,
    ) -> Result<Option<Decision>, DispatchError>
    where
        I: IntoIterator<Item = &'a OperationSpec>,
        I::IntoIter: Clone,
    {
        let specs = specs.into_iter();
        let request = ServiceRequest {
            system_prompt: self.system_prompt.clone(),
            instruction: instruction.to_string(),
            declarations: declarations(specs.clone()),
        };

        let reply = self.client.complete(&request).map_err(|e| {
            warn!("Reasoning service call failed: {}", e);
            DispatchError::DecisionService(e)
        })?;

        let candidates = reply.tool_calls.len();
        let Some(call) = reply.tool_calls.into_iter().next() else {
            debug!("No operation chosen for instruction");
            return Ok(None);
        };
        if candidates > 1 {
            warn!(
                "Service proposed {} calls; using the first ({})",
                candidates, call.name
            );
        }

        let spec = specs.clone().find(|s| s.name == call.name);
        let arguments = parse_arguments(&call, spec)?;
        debug!("Decision: {} {}", call.name, arguments.to_json());

        Ok(Some(Decision {
            operation: call.name,
            arguments,
            provenance: Provenance {
                request_id: uuid::Uuid::new_v4().to_string(),
                model: if reply.model.is_empty() {
                    self.client.model().to_string()
                } else {
                    reply.model
                },
                candidates,
                raw_arguments: call.arguments,
            },
        }))
    }
}

/// Deserialize a raw argument payload, guided by the operation's declared types
/// when the operation is known.
pub fn parse_arguments(
    call: &ToolCall,
    spec: Option<&OperationSpec>,
) -> Result<Arguments, DispatchError> {
    let raw = call.arguments.trim();
    if raw.is_empty() {
        return Ok(Arguments::new());
    }

    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| DispatchError::MalformedArguments(format!("{}: {}", call.name, e)))?;
    let object = value.as_object().ok_or_else(|| {
        DispatchError::MalformedArguments(format!("{}: expected a JSON object", call.name))
    })?;

    let mut arguments = Arguments::new();
    for (key, value) in object {
        let param = spec.and_then(|s| s.find_param(key));
        // Models send null for optional parameters they leave out
        if value.is_null() && param.is_some_and(|p| !p.required) {
            continue;
        }
        let declared = param.map(|p| p.ty);
        let arg = ArgValue::from_json(value, declared).ok_or_else(|| {
            DispatchError::MalformedArguments(format!(
                "{}: argument '{}' is not a string, number or boolean",
                call.name, key
            ))
        })?;
        arguments.insert(key.clone(), arg);
    }
    Ok(arguments)
}
