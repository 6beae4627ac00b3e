//! Instruction pipeline: requester, then dispatcher.
//!
//! One instruction produces at most one decision and one execution.

use std::sync::Arc;
use tracing::info;

use crate::decision::{Decision, DecisionRequester};
use crate::dispatcher::{Dispatcher, ExecutionResult};
use crate::error::DispatchError;
use crate::llm_client::ReasoningClient;
use crate::registry::Registry;

/// How handling an instruction ended
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// The service chose no operation
    NoDecision,
    /// A decision was made and dispatched; the result may still be a failure
    Executed {
        decision: Decision,
        result: ExecutionResult,
    },
    /// The decision could not be obtained
    DecisionFailed(DispatchError),
}

impl RouteOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RouteOutcome::Executed { result: Ok(_), .. })
    }
}

pub struct IntentRouter<C> {
    requester: DecisionRequester<C>,
    dispatcher: Dispatcher,
}

impl<C: ReasoningClient> IntentRouter<C> {
    pub fn new(client: C, system_prompt: impl Into<String>, registry: Arc<Registry>) -> Self {
        Self {
            requester: DecisionRequester::new(client, system_prompt),
            dispatcher: Dispatcher::new(registry),
        }
    }

    pub fn registry(&self) -> &Registry {
        self.dispatcher.registry()
    }

    pub fn requester(&self) -> &DecisionRequester<C> {
        &self.requester
    }

    pub fn handle(&self, instruction: &str) -> RouteOutcome {
        let specs = self.dispatcher.registry().describe_all();
        match self.requester.decide(instruction, specs) {
            Ok(None) => {
                info!("No operation chosen");
                RouteOutcome::NoDecision
            }
            Ok(Some(decision)) => {
                let result = self.dispatcher.execute(&decision);
                RouteOutcome::Executed { decision, result }
            }
            Err(e) => RouteOutcome::DecisionFailed(e),
        }
    }
}
