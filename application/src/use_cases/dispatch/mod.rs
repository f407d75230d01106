//! Dispatch use case
//!
//! The single entry point through which tools, agents and flows are
//! invoked. Every call walks the same logical state machine:
//!
//! ```text
//! RECEIVED ──▶ RESOLVED ──▶ AVAILABILITY_CHECKED ──▶ EXECUTED
//!     │            │                 │                   │
//!     │            ▼                 ▼                   ▼
//!     │     TOOL_NOT_FOUND    TOOL_UNAVAILABLE     SUCCESS / EXECUTION_ERROR
//!     │                       INVALID_PARAMS
//!     └──▶ (no executor) EXECUTION_ERROR "not initialized"
//! ```
//!
//! Failures never escape as `Err` or panics. Each one becomes a
//! [`DispatchResult`] whose message names the target and the real cause
//! and says that nothing was performed.

pub mod stats;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use futures::FutureExt;
use relay_domain::tool::messages;
use relay_domain::{
    AliasResolver, DefaultParamValidator, DispatchOutcome, DispatchResult, IntentMatch,
    IntentRecognizer, InvocationMode, ParamMap, ParamValidator, ProviderError, TargetKind,
    ToolCall,
};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::config::DispatchParams;
use crate::ports::dispatch_logger::{DispatchEvent, DispatchLogger, NoDispatchLogger};
use crate::ports::executor::ExecutorPort;

pub use self_test::{
    SelfTestCase, SelfTestCaseResult, SelfTestError, SelfTestReport, SelfTestUseCase,
};
pub use stats::DispatchStats;

type Invocation = Result<Result<Value, ProviderError>, Box<dyn Any + Send>>;

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("executor panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("executor panicked: {}", s)
    } else {
        "executor panicked".to_string()
    }
}

/// Routes calls to the executor with honest failure reporting.
///
/// Cheap to share: wrap it in an `Arc` and call it from as many tasks as
/// needed. The statistics counters are the only mutable state.
pub struct Dispatcher {
    resolver: Arc<AliasResolver>,
    recognizer: Arc<IntentRecognizer>,
    executor: Option<Arc<dyn ExecutorPort>>,
    validator: Arc<dyn ParamValidator>,
    logger: Arc<dyn DispatchLogger>,
    params: DispatchParams,
    stats: Mutex<DispatchStats>,
}

impl Dispatcher {
    /// Create a dispatcher without an executor.
    ///
    /// Until [`with_executor`](Self::with_executor) is called every dispatch
    /// that gets past name resolution reports "executor is not initialized".
    pub fn new(resolver: Arc<AliasResolver>, recognizer: Arc<IntentRecognizer>) -> Self {
        Self {
            resolver,
            recognizer,
            executor: None,
            validator: Arc::new(DefaultParamValidator),
            logger: Arc::new(NoDispatchLogger),
            params: DispatchParams::default(),
            stats: Mutex::new(DispatchStats::default()),
        }
    }

    pub fn with_executor(mut self, executor: Arc<dyn ExecutorPort>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn ParamValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn DispatchLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_params(mut self, params: DispatchParams) -> Self {
        self.params = params;
        self
    }

    pub fn resolver(&self) -> &AliasResolver {
        &self.resolver
    }

    pub fn recognizer(&self) -> &IntentRecognizer {
        &self.recognizer
    }

    pub fn params(&self) -> &DispatchParams {
        &self.params
    }

    // ==================== Entry Points ====================

    /// Dispatch a tool by name.
    ///
    /// `name` may be any alias or spelling. The parameter map is moved into
    /// the call record and never handed back.
    pub async fn dispatch_tool_call(
        &self,
        name: &str,
        params: ParamMap,
        source_text: &str,
        mode: InvocationMode,
        context: ParamMap,
    ) -> DispatchResult {
        let started = Instant::now();
        let call = ToolCall::new(TargetKind::Tool, name, mode)
            .with_params(params)
            .with_context(context)
            .with_source_text(source_text);

        let result = self.run_tool(call, started).await;
        self.finish(result)
    }

    /// Recognize the tool from free text, then dispatch it.
    ///
    /// Returns `None` when no candidate reaches the confidence gate: nothing
    /// was attempted and the statistics are untouched. `min_confidence`
    /// falls back to the configured default.
    pub async fn dispatch_by_intent(
        &self,
        source_text: &str,
        forced_tool: Option<&str>,
        context: ParamMap,
        min_confidence: Option<f64>,
    ) -> Option<DispatchResult> {
        let threshold = min_confidence.unwrap_or(self.params.min_confidence);
        // Resolve a forced alias up front so its declared extractors run
        let forced = forced_tool.map(|raw| self.resolver.normalize(raw).unwrap_or(raw));

        let Some(intent) = self.recognizer.best_match(source_text, forced, threshold) else {
            debug!(threshold, "No intent reached the confidence gate");
            return None;
        };

        debug!(
            tool = %intent.tool_name,
            confidence = intent.confidence,
            mode = %intent.mode,
            "Dispatching recognized intent"
        );

        Some(
            self.dispatch_tool_call(
                &intent.tool_name,
                intent.extracted_params,
                source_text,
                intent.mode,
                context,
            )
            .await,
        )
    }

    /// Dispatch an agent after checking that the executor offers it
    pub async fn dispatch_agent_call(
        &self,
        name: &str,
        params: ParamMap,
        context: ParamMap,
    ) -> DispatchResult {
        let started = Instant::now();
        let name = name.trim();
        let call = ToolCall::new(TargetKind::Agent, name, InvocationMode::Forced)
            .with_canonical(name)
            .with_params(params)
            .with_context(context);

        let result = match &self.executor {
            None => Self::not_initialized(call, started),
            Some(executor) => {
                if executor.is_agent_available(name).await {
                    let invocation =
                        AssertUnwindSafe(executor.invoke_agent(name, &call.params, &call.context))
                            .catch_unwind()
                            .await;
                    Self::settle(call, invocation, started)
                } else {
                    let message = messages::unavailable(TargetKind::Agent, name);
                    DispatchResult::failure(
                        call,
                        DispatchOutcome::ToolUnavailable,
                        message,
                        "agent is not registered with the executor",
                        started.elapsed(),
                    )
                }
            }
        };
        self.finish(result)
    }

    /// Dispatch a flow. There is no availability pre-check; an unknown or
    /// misconfigured flow fails inside the executor.
    pub async fn dispatch_flow_call(
        &self,
        name: &str,
        params: ParamMap,
        context: ParamMap,
    ) -> DispatchResult {
        let started = Instant::now();
        let name = name.trim();
        let call = ToolCall::new(TargetKind::Flow, name, InvocationMode::Forced)
            .with_canonical(name)
            .with_params(params)
            .with_context(context);

        let result = match &self.executor {
            None => Self::not_initialized(call, started),
            Some(executor) => {
                let invocation =
                    AssertUnwindSafe(executor.invoke_flow(name, &call.params, &call.context))
                        .catch_unwind()
                        .await;
                Self::settle(call, invocation, started)
            }
        };
        self.finish(result)
    }

    // ==================== Queries ====================

    /// Display-only candidates for free text
    pub fn suggest_tools(&self, text: &str, max_n: usize) -> Vec<IntentMatch> {
        self.recognizer.suggest(text, max_n)
    }

    /// Structural parameter check for a tool name (any spelling)
    pub fn validate_params(&self, tool_name: &str, params: &ParamMap) -> Result<(), String> {
        let canonical = self.resolver.normalize(tool_name).unwrap_or(tool_name);
        self.validator.validate(canonical, params)
    }

    /// Snapshot of the usage counters
    pub fn get_stats(&self) -> DispatchStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Capabilities the executor currently advertises, sorted and deduplicated
    pub async fn get_available_tools(&self) -> Vec<String> {
        let Some(executor) = &self.executor else {
            return Vec::new();
        };
        let mut tools = executor.available_capabilities().await;
        tools.sort();
        tools.dedup();
        tools
    }

    /// Aliases of a tool (any spelling), itself included
    pub fn get_tool_aliases(&self, name: &str) -> Vec<String> {
        match self.resolver.normalize(name) {
            Some(canonical) => self.resolver.aliases_for(canonical),
            None => Vec::new(),
        }
    }

    // ==================== Internals ====================

    async fn run_tool(&self, call: ToolCall, started: Instant) -> DispatchResult {
        let Some(canonical) = self
            .resolver
            .normalize(&call.original_name)
            .map(str::to_string)
        else {
            let suggestions = self
                .resolver
                .suggest(&call.original_name, self.params.suggestion_limit);
            let message = messages::not_found(&call.original_name, &suggestions);
            return DispatchResult::failure(
                call,
                DispatchOutcome::ToolNotFound,
                message,
                "name does not resolve to any registered tool",
                started.elapsed(),
            )
            .with_suggestions(suggestions);
        };
        let call = call.with_canonical(&canonical);

        let Some(executor) = &self.executor else {
            return Self::not_initialized(call, started);
        };

        let Some(backend) = executor.backend_for(&canonical).await else {
            let message = messages::unavailable(TargetKind::Tool, &canonical);
            return DispatchResult::failure(
                call,
                DispatchOutcome::ToolUnavailable,
                message,
                "no registered backend offers this capability",
                started.elapsed(),
            );
        };

        if let Err(reason) = self.validator.validate(&canonical, &call.params) {
            let message = messages::invalid_params(&canonical, &reason);
            return DispatchResult::failure(
                call,
                DispatchOutcome::InvalidParams,
                message,
                reason,
                started.elapsed(),
            );
        }

        debug!(tool = %canonical, backend = %backend, "Invoking capability");
        let invocation =
            AssertUnwindSafe(executor.invoke_capability(&canonical, &backend, &call.params))
                .catch_unwind()
                .await;
        Self::settle(call, invocation, started)
    }

    fn not_initialized(call: ToolCall, started: Instant) -> DispatchResult {
        let message = messages::not_initialized(call.target, call.display_name());
        DispatchResult::failure(
            call,
            DispatchOutcome::ExecutionError,
            message,
            "executor is not initialized",
            started.elapsed(),
        )
    }

    /// Turn an executor return, error or panic into a result
    fn settle(call: ToolCall, invocation: Invocation, started: Instant) -> DispatchResult {
        let cause = match invocation {
            Ok(Ok(payload)) => return DispatchResult::success(call, payload, started.elapsed()),
            Ok(Err(e)) => e.to_string(),
            Err(panic) => panic_message(panic.as_ref()),
        };
        let message = messages::execution_failed(call.target, call.display_name(), &cause);
        DispatchResult::failure(
            call,
            DispatchOutcome::ExecutionError,
            message,
            cause,
            started.elapsed(),
        )
    }

    /// Count, trace and log a finished attempt
    fn finish(&self, result: DispatchResult) -> DispatchResult {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(&result);

        let call = &result.call;
        let elapsed_ms = result.elapsed.as_millis() as u64;
        info!(
            target_kind = %call.target,
            tool = %call.display_name(),
            mode = %call.mode,
            outcome = %result.outcome,
            elapsed_ms,
            "Dispatch finished"
        );
        if !result.is_success() {
            warn!(
                tool = %call.display_name(),
                outcome = %result.outcome,
                cause = result.cause.as_deref().unwrap_or_default(),
                "{}",
                result.error_message().unwrap_or_default()
            );
        }

        self.logger.log(DispatchEvent::new(
            "dispatch_result",
            json!({
                "target": call.target,
                "original_name": call.original_name,
                "canonical_name": call.canonical_name,
                "mode": call.mode,
                "outcome": result.outcome,
                "params": call.params,
                "elapsed_ms": elapsed_ms,
                "error_message": result.error_message,
                "cause": result.cause,
                "suggestions": result.suggestions,
            }),
        ));

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use relay_domain::{BackendHint, BackendKind, default_alias_resolver, default_intent_recognizer};

    /// Mock executor with a fixed capability set and scripted behavior
    #[derive(Default)]
    struct MockExecutor {
        capabilities: Vec<String>,
        agents: Vec<String>,
        fail_with: Option<String>,
        panic: bool,
        calls: Mutex<Vec<(String, ParamMap)>>,
    }

    impl MockExecutor {
        fn with_capabilities(caps: &[&str]) -> Self {
            Self {
                capabilities: caps.iter().map(|c| c.to_string()).collect(),
                ..Default::default()
            }
        }

        fn failing(mut self, message: &str) -> Self {
            self.fail_with = Some(message.to_string());
            self
        }

        fn panicking(mut self) -> Self {
            self.panic = true;
            self
        }

        fn with_agent(mut self, agent: &str) -> Self {
            self.agents.push(agent.to_string());
            self
        }

        fn calls(&self) -> Vec<(String, ParamMap)> {
            self.calls.lock().unwrap().clone()
        }

        fn respond(&self, name: &str, params: &ParamMap) -> Result<Value, ProviderError> {
            self.calls
                .lock()
                .unwrap()
                .push((name.to_string(), params.clone()));
            if self.panic {
                panic!("backend exploded");
            }
            match &self.fail_with {
                Some(message) => Err(ProviderError::ExecutionFailed(message.clone())),
                None => Ok(json!({"ran": name})),
            }
        }
    }

    #[async_trait]
    impl ExecutorPort for MockExecutor {
        async fn backend_for(&self, capability: &str) -> Option<BackendHint> {
            self.capabilities
                .iter()
                .any(|c| c == capability)
                .then(|| BackendHint::new("mock", BackendKind::Local))
        }

        async fn available_capabilities(&self) -> Vec<String> {
            let mut caps = self.capabilities.clone();
            caps.extend(self.capabilities.iter().cloned());
            caps
        }

        async fn is_agent_available(&self, agent: &str) -> bool {
            self.agents.iter().any(|a| a == agent)
        }

        async fn invoke_capability(
            &self,
            capability: &str,
            _backend: &BackendHint,
            params: &ParamMap,
        ) -> Result<Value, ProviderError> {
            self.respond(capability, params)
        }

        async fn invoke_agent(
            &self,
            agent: &str,
            params: &ParamMap,
            _context: &ParamMap,
        ) -> Result<Value, ProviderError> {
            self.respond(agent, params)
        }

        async fn invoke_flow(
            &self,
            flow: &str,
            params: &ParamMap,
            _context: &ParamMap,
        ) -> Result<Value, ProviderError> {
            if flow == "missing" {
                return Err(ProviderError::NotFound(format!("flow '{}'", flow)));
            }
            self.respond(flow, params)
        }
    }

    /// Logger that keeps every event in memory
    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<(String, Value)>>,
    }

    impl DispatchLogger for RecordingLogger {
        fn log(&self, event: DispatchEvent) {
            self.events
                .lock()
                .unwrap()
                .push((event.event_type.to_string(), event.payload));
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(
            Arc::new(default_alias_resolver()),
            Arc::new(default_intent_recognizer()),
        )
    }

    fn with_executor(executor: MockExecutor) -> (Dispatcher, Arc<MockExecutor>) {
        let executor = Arc::new(executor);
        let dispatcher = dispatcher().with_executor(executor.clone());
        (dispatcher, executor)
    }

    fn params(pairs: &[(&str, &str)]) -> ParamMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    #[tokio::test]
    async fn test_forced_alias_dispatch_succeeds() {
        let (dispatcher, executor) =
            with_executor(MockExecutor::with_capabilities(&["execute_shell"]));

        let result = dispatcher
            .dispatch_tool_call(
                "Run_Command",
                params(&[("command", "ls")]),
                "",
                InvocationMode::Forced,
                ParamMap::new(),
            )
            .await;

        assert_eq!(result.outcome, DispatchOutcome::Success);
        assert_eq!(result.call.canonical_name.as_deref(), Some("execute_shell"));
        assert_eq!(result.call.original_name, "Run_Command");
        assert_eq!(result.payload().unwrap()["ran"], "execute_shell");
        assert!(result.error_message().is_none());
        assert_eq!(executor.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_not_found_with_suggestions() {
        let (dispatcher, executor) =
            with_executor(MockExecutor::with_capabilities(&["execute_shell"]));

        let result = dispatcher
            .dispatch_tool_call(
                "totally_unknown_tool",
                ParamMap::new(),
                "",
                InvocationMode::Forced,
                ParamMap::new(),
            )
            .await;

        assert_eq!(result.outcome, DispatchOutcome::ToolNotFound);
        assert!(result.payload().is_none());
        assert!(result.call.canonical_name.is_none());
        assert!(!result.suggestions.is_empty());
        let message = result.error_message().unwrap();
        assert!(message.contains("'totally_unknown_tool'"));
        assert!(message.contains(messages::NOT_PERFORMED));
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_tool() {
        let (dispatcher, executor) = with_executor(MockExecutor::with_capabilities(&[]));

        let result = dispatcher
            .dispatch_tool_call(
                "execute_shell",
                ParamMap::new(),
                "",
                InvocationMode::Forced,
                ParamMap::new(),
            )
            .await;

        assert_eq!(result.outcome, DispatchOutcome::ToolUnavailable);
        assert!(result.payload().is_none());
        assert!(result.suggestions.is_empty());
        assert!(result.error_message().unwrap().contains("execute_shell"));
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_params_not_invoked() {
        let (dispatcher, executor) =
            with_executor(MockExecutor::with_capabilities(&["execute_shell"]));

        let result = dispatcher
            .dispatch_tool_call("bash", ParamMap::new(), "", InvocationMode::Forced, ParamMap::new())
            .await;

        assert_eq!(result.outcome, DispatchOutcome::InvalidParams);
        assert!(
            result
                .error_message()
                .unwrap()
                .contains("Missing required parameter 'command'")
        );
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_execution_error_preserves_cause() {
        let (dispatcher, _) = with_executor(
            MockExecutor::with_capabilities(&["translator"]).failing("quota exceeded for today"),
        );

        let result = dispatcher
            .dispatch_tool_call("translate", ParamMap::new(), "", InvocationMode::Forced, ParamMap::new())
            .await;

        assert_eq!(result.outcome, DispatchOutcome::ExecutionError);
        assert_eq!(result.cause.as_deref(), Some("quota exceeded for today"));
        let message = result.error_message().unwrap();
        assert!(message.contains("translator"));
        assert!(message.contains("quota exceeded for today"));
        assert!(message.contains("must not be reported as completed"));
        assert!(result.payload().is_none());
    }

    #[tokio::test]
    async fn test_executor_panic_becomes_execution_error() {
        let (dispatcher, _) =
            with_executor(MockExecutor::with_capabilities(&["translator"]).panicking());

        let result = dispatcher
            .dispatch_tool_call("translator", ParamMap::new(), "", InvocationMode::Forced, ParamMap::new())
            .await;

        assert_eq!(result.outcome, DispatchOutcome::ExecutionError);
        assert!(result.cause.as_deref().unwrap().contains("backend exploded"));
        assert_eq!(dispatcher.get_stats().failed_calls, 1);
    }

    #[tokio::test]
    async fn test_no_executor_reports_not_initialized() {
        let dispatcher = dispatcher();

        let tool = dispatcher
            .dispatch_tool_call("translator", ParamMap::new(), "", InvocationMode::Forced, ParamMap::new())
            .await;
        assert_eq!(tool.outcome, DispatchOutcome::ExecutionError);
        assert!(tool.error_message().unwrap().contains("not initialized"));

        let agent = dispatcher
            .dispatch_agent_call("researcher", ParamMap::new(), ParamMap::new())
            .await;
        assert_eq!(agent.outcome, DispatchOutcome::ExecutionError);

        let flow = dispatcher
            .dispatch_flow_call("nightly", ParamMap::new(), ParamMap::new())
            .await;
        assert!(flow.error_message().unwrap().contains("Cannot dispatch flow 'nightly'"));

        // name resolution still happens first
        let missing = dispatcher
            .dispatch_tool_call("totally_unknown_tool", ParamMap::new(), "", InvocationMode::Forced, ParamMap::new())
            .await;
        assert_eq!(missing.outcome, DispatchOutcome::ToolNotFound);
    }

    #[tokio::test]
    async fn test_dispatch_by_intent_extracts_params() {
        let (dispatcher, executor) =
            with_executor(MockExecutor::with_capabilities(&["execute_shell"]));

        let result = dispatcher
            .dispatch_by_intent("выполни ls -la", None, ParamMap::new(), None)
            .await
            .unwrap();

        assert_eq!(result.outcome, DispatchOutcome::Success);
        assert_eq!(result.call.mode, InvocationMode::Auto);
        assert_eq!(result.call.source_text, "выполни ls -la");
        let calls = executor.calls();
        assert_eq!(calls[0].0, "execute_shell");
        assert_eq!(calls[0].1["command"], "ls -la");
    }

    #[tokio::test]
    async fn test_dispatch_by_intent_below_gate_is_none() {
        let (dispatcher, executor) =
            with_executor(MockExecutor::with_capabilities(&["data_analyzer"]));

        let result = dispatcher
            .dispatch_by_intent("show some statistics", None, ParamMap::new(), Some(0.99))
            .await;
        assert!(result.is_none());

        let result = dispatcher
            .dispatch_by_intent("hello there", None, ParamMap::new(), None)
            .await;
        assert!(result.is_none());

        assert_eq!(dispatcher.get_stats().total_calls, 0);
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_by_intent_forced_alias() {
        let (dispatcher, executor) =
            with_executor(MockExecutor::with_capabilities(&["execute_shell"]));

        let result = dispatcher
            .dispatch_by_intent("please run `uptime`", Some("terminal"), ParamMap::new(), Some(1.0))
            .await
            .unwrap();

        assert_eq!(result.outcome, DispatchOutcome::Success);
        assert_eq!(result.call.mode, InvocationMode::Forced);
        assert_eq!(executor.calls()[0].1["command"], "uptime");
    }

    #[tokio::test]
    async fn test_agent_dispatch() {
        let (dispatcher, executor) =
            with_executor(MockExecutor::with_capabilities(&[]).with_agent("researcher"));

        let ok = dispatcher
            .dispatch_agent_call("researcher", params(&[("topic", "rust")]), ParamMap::new())
            .await;
        assert!(ok.is_success());
        assert_eq!(ok.call.target, TargetKind::Agent);

        let missing = dispatcher
            .dispatch_agent_call("writer", ParamMap::new(), ParamMap::new())
            .await;
        assert_eq!(missing.outcome, DispatchOutcome::ToolUnavailable);
        assert!(missing.error_message().unwrap().starts_with("Agent 'writer'"));
        assert_eq!(executor.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_flow_dispatch_has_no_precheck() {
        let (dispatcher, executor) = with_executor(MockExecutor::with_capabilities(&[]));

        let ok = dispatcher
            .dispatch_flow_call("nightly", ParamMap::new(), ParamMap::new())
            .await;
        assert!(ok.is_success());
        assert_eq!(executor.calls()[0].0, "nightly");

        let missing = dispatcher
            .dispatch_flow_call("missing", ParamMap::new(), ParamMap::new())
            .await;
        assert_eq!(missing.outcome, DispatchOutcome::ExecutionError);
        assert!(missing.error_message().unwrap().starts_with("Flow 'missing'"));
    }

    #[tokio::test]
    async fn test_stats_are_monotonic() {
        let (dispatcher, _) = with_executor(MockExecutor::with_capabilities(&["translator"]));

        let mut previous = 0;
        for name in ["translator", "nope_nope", "translate", "execute_shell"] {
            dispatcher
                .dispatch_tool_call(name, ParamMap::new(), "", InvocationMode::Forced, ParamMap::new())
                .await;
            let stats = dispatcher.get_stats();
            assert_eq!(stats.total_calls, previous + 1);
            previous = stats.total_calls;
        }

        let stats = dispatcher.get_stats();
        assert_eq!(stats.successful_calls, 2);
        assert_eq!(stats.failed_calls, 2);
        assert_eq!(stats.by_tool["translator"], 2);
        assert_eq!(stats.by_tool["execute_shell"], 1);
        assert_eq!(stats.by_mode[&InvocationMode::Forced], 4);
    }

    #[tokio::test]
    async fn test_logger_receives_every_attempt() {
        let logger = Arc::new(RecordingLogger::default());
        let dispatcher = dispatcher()
            .with_executor(Arc::new(MockExecutor::with_capabilities(&["translator"])))
            .with_logger(logger.clone());

        dispatcher
            .dispatch_tool_call("translator", ParamMap::new(), "", InvocationMode::Forced, ParamMap::new())
            .await;
        dispatcher
            .dispatch_tool_call("zzz", ParamMap::new(), "", InvocationMode::Forced, ParamMap::new())
            .await;

        let events = logger.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0, "dispatch_result");
        assert_eq!(events[0].1["outcome"], "SUCCESS");
        assert_eq!(events[1].1["outcome"], "TOOL_NOT_FOUND");
        assert_eq!(events[1].1["original_name"], "zzz");
    }

    #[tokio::test]
    async fn test_queries() {
        let (dispatcher, _) =
            with_executor(MockExecutor::with_capabilities(&["web_search", "api_call"]));

        assert_eq!(dispatcher.get_available_tools().await, vec!["api_call", "web_search"]);
        assert!(dispatcher.get_tool_aliases("GOOGLE").contains(&"web_search".to_string()));
        assert!(dispatcher.get_tool_aliases("qqqq").is_empty());
        assert!(dispatcher.validate_params("shell", &ParamMap::new()).is_err());
        assert!(dispatcher.validate_params("translator", &ParamMap::new()).is_ok());

        let suggestions = dispatcher.suggest_tools("google rust", 3);
        assert_eq!(suggestions[0].mode, InvocationMode::Suggested);
        assert!(dispatcher.get_available_tools().await.len() == 2);
        assert!(self::dispatcher().get_available_tools().await.is_empty());
    }
}
