//! Orchestration state machine for one agent run.
//!
//! Drives the model/tool conversation through an explicit set of states:
//! request a model turn, route on its content, execute at most one tool per
//! turn, feed the result back, and repeat until the model produces a final
//! answer or the re-ask budget runs out. Routing is a single ordered
//! decision table applied identically at every checkpoint, and the re-ask
//! counter is advanced by the state machine itself, never as a side effect
//! of evaluating a guard.

use crate::agent::client::ModelClient;
use crate::agent::conversation::Conversation;
use crate::agent::dedup::DedupPolicy;
use crate::agent::extractor::FinalAnswer;
use crate::agent::types::{GenerationOptions, Message, ToolDefinition};
use crate::error::{Error, Result};
use crate::tools::{ToolCall, ToolRegistry, ToolResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configuration for one orchestration run.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// System prompt seeded into every conversation
    pub system_prompt: String,
    /// Maximum re-ask cycles before the run is declared non-convergent
    pub max_reasks: u32,
    /// Generation options for model calls
    pub options: GenerationOptions,
}

impl OrchestratorConfig {
    /// Configuration for the packing assistant: the canonical system prompt
    /// and the default re-ask budget.
    pub fn packing(max_reasks: u32) -> Self {
        OrchestratorConfig {
            system_prompt: crate::agent::prompts::PACKING_SYSTEM_PROMPT.to_string(),
            max_reasks,
            options: GenerationOptions::balanced(),
        }
    }
}

/// Mutable state scoped to one run.
#[derive(Debug)]
struct RunState {
    /// Tool names already admitted
    dedup: DedupPolicy,
    /// Re-ask cycles consumed so far
    reasks: u32,
    /// Re-ask budget
    max_reasks: u32,
}

impl RunState {
    fn new(max_reasks: u32) -> Self {
        RunState {
            dedup: DedupPolicy::new(),
            reasks: 0,
            max_reasks,
        }
    }

    /// Consume one re-ask cycle. Returns false once the budget is exhausted.
    fn note_reask(&mut self) -> bool {
        self.reasks += 1;
        self.reasks <= self.max_reasks
    }
}

/// States of the control loop.
enum AgentState {
    /// Seed the conversation with the initial user message
    Start { seed: String },
    /// Send the accumulated conversation and await one assistant turn
    AwaitingModel,
    /// Decide what the received turn means
    RoutingTurn { turn: Message },
    /// Execute the admitted tool call
    ExecutingTool { call: ToolCall },
    /// Append the tool result and go back to the model
    SendingToolResult { call_id: String, result: ToolResult },
    /// Terminal success
    Finished { answer: FinalAnswer },
    /// Terminal failure: re-ask budget exhausted without a final answer
    Aborted,
}

/// The result of a successful run.
#[derive(Debug)]
pub struct RunReport {
    /// The single final answer produced by the run
    pub answer: FinalAnswer,
    /// The full conversation, for inspection
    pub conversation: Conversation,
    /// Re-ask cycles consumed
    pub reasks: u32,
}

/// Composes model client, tool registry, completion detection, and dedup
/// policy into one bounded control loop.
pub struct Orchestrator {
    model: Arc<dyn ModelClient>,
    tools: Arc<ToolRegistry>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        model: Arc<dyn ModelClient>,
        tools: Arc<ToolRegistry>,
        config: OrchestratorConfig,
    ) -> Self {
        Orchestrator {
            model,
            tools,
            config,
        }
    }

    /// Run the state machine to completion for one seed message.
    ///
    /// Returns the final answer, or [`Error::NonConvergence`] when the
    /// re-ask budget is exhausted. Model transport failures propagate
    /// unchanged; tool failures never end the run.
    pub async fn run(&self, seed: impl Into<String>) -> Result<RunReport> {
        let mut conversation = Conversation::new(&self.config.system_prompt);
        let mut run_state = RunState::new(self.config.max_reasks);
        let tool_definitions: Vec<ToolDefinition> = self.tools.definitions();

        let mut state = AgentState::Start { seed: seed.into() };

        loop {
            state = match state {
                AgentState::Start { seed } => {
                    info!("Starting run {}", conversation.id);
                    conversation.push_user(seed);
                    AgentState::AwaitingModel
                }
                AgentState::AwaitingModel => {
                    let turn = self
                        .model
                        .complete(
                            conversation.api_messages(),
                            &tool_definitions,
                            &self.config.options,
                        )
                        .await?;
                    AgentState::RoutingTurn { turn }
                }
                AgentState::RoutingTurn { turn } => {
                    self.route_turn(turn, &mut conversation, &mut run_state)
                }
                AgentState::ExecutingTool { call } => {
                    info!("Executing tool: {}", call.name);
                    let call_id = call.id.clone();
                    let result = match self.tools.execute(&call).await {
                        Ok(result) => result,
                        // Tool-level failures are relayed to the model, not
                        // surfaced to the caller.
                        Err(e) => ToolResult::failure(e.to_string()),
                    };
                    AgentState::SendingToolResult { call_id, result }
                }
                AgentState::SendingToolResult { call_id, result } => {
                    let rendered = result.render();
                    debug!(
                        "Tool result ({}): {}",
                        if result.success { "ok" } else { "failed" },
                        rendered.chars().take(200).collect::<String>()
                    );
                    conversation.push(Message::tool(call_id, rendered));
                    AgentState::AwaitingModel
                }
                AgentState::Finished { answer } => {
                    info!(
                        "Run {} finished after {} re-asks",
                        conversation.id, run_state.reasks
                    );
                    return Ok(RunReport {
                        answer,
                        conversation,
                        reasks: run_state.reasks,
                    });
                }
                AgentState::Aborted => {
                    warn!(
                        "Run {} aborted: no final answer within {} re-asks",
                        conversation.id, run_state.max_reasks
                    );
                    return Err(Error::NonConvergence(run_state.max_reasks));
                }
            };
        }
    }

    /// The ordered decision table for one assistant turn.
    ///
    /// 1. Tool calls present: dispatch the first call whose name the dedup
    ///    policy admits (the mark happens here, before dispatch). A turn
    ///    whose every requested name is already used falls through to the
    ///    re-ask branch without error.
    /// 2. No tool calls and the text parses as a final answer: finish.
    /// 3. Otherwise: consume one re-ask cycle or abort.
    fn route_turn(
        &self,
        turn: Message,
        conversation: &mut Conversation,
        run_state: &mut RunState,
    ) -> AgentState {
        conversation.push(turn.clone());

        if let Some(calls) = turn.tool_calls.as_ref().filter(|c| !c.is_empty()) {
            for requested in calls {
                let name = &requested.function.name;
                if !run_state.dedup.admit(name) {
                    warn!("Duplicate tool call ignored: {}", name);
                    continue;
                }

                let arguments = match serde_json::from_str(&requested.function.arguments) {
                    Ok(value) => value,
                    Err(e) => {
                        // The tool reports the missing fields itself.
                        warn!("Unparseable arguments for {}: {}", name, e);
                        serde_json::json!({})
                    }
                };

                return AgentState::ExecutingTool {
                    call: ToolCall {
                        id: requested.id.clone(),
                        name: name.clone(),
                        arguments,
                    },
                };
            }

            return self.reask_or_abort(run_state);
        }

        if let Some(answer) = FinalAnswer::parse(&turn.content) {
            return AgentState::Finished { answer };
        }

        debug!("Turn neither final nor a fresh tool call; re-asking");
        self.reask_or_abort(run_state)
    }

    fn reask_or_abort(&self, run_state: &mut RunState) -> AgentState {
        if run_state.note_reask() {
            AgentState::AwaitingModel
        } else {
            AgentState::Aborted
        }
    }
}
