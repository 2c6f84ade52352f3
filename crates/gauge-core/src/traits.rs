//! Core trait definitions for the Gauge evaluation pipeline.
//!
//! - `Policy`           : one evaluable rule, one decision per context
//! - `PreEvaluateHook`  : observes the context before any policy runs
//! - `DecisionHook`     : observes a single policy's deny / escalation
//! - `PostEvaluateHook` : observes the full result list of a pass
//!
//! Each hook trait's signature states exactly which payload it consumes.
//! Hooks are wrapped in [`Hook`] for registration so the event a handler
//! subscribes to is fixed by its type.

use gauge_contracts::{
    error::GaugeResult,
    policy::{PolicyCategory, PolicyContext, PolicyResult},
};

/// A single rule evaluated by the `PolicyEngine`.
///
/// Implementations should be total and fast. Returning `Err` (or panicking)
/// does not abort the pass: the engine substitutes a `deny` result for this
/// policy and continues with the rest.
pub trait Policy: Send + Sync {
    /// Stable identifier written into every result and audit record.
    fn id(&self) -> &str;

    /// Grouping tag for reporting.
    fn category(&self) -> PolicyCategory;

    /// Decide on `ctx`. Must return a result whose `policy_id` is `self.id()`.
    fn evaluate(&self, ctx: &PolicyContext) -> GaugeResult<PolicyResult>;
}

/// Called once per pass, before the first policy is evaluated.
pub trait PreEvaluateHook: Send + Sync {
    fn pre_evaluate(&self, ctx: &PolicyContext) -> GaugeResult<()>;
}

/// Called after an individual policy produced a deny or an escalation.
pub trait DecisionHook: Send + Sync {
    fn on_decision(&self, policy: &dyn Policy, ctx: &PolicyContext, result: &PolicyResult) -> GaugeResult<()>;
}

/// Called once per pass, after every enabled policy has produced a result.
pub trait PostEvaluateHook: Send + Sync {
    fn post_evaluate(&self, ctx: &PolicyContext, results: &[PolicyResult]) -> GaugeResult<()>;
}

/// The fixed set of lifecycle events a hook can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    PreEvaluate,
    PostEvaluate,
    OnDeny,
    OnEscalationRequired,
}

impl HookEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookEvent::PreEvaluate => "pre_evaluate",
            HookEvent::PostEvaluate => "post_evaluate",
            HookEvent::OnDeny => "on_deny",
            HookEvent::OnEscalationRequired => "on_escalation_required",
        }
    }
}

impl std::fmt::Display for HookEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hook bound to the event it subscribes to.
pub enum Hook {
    PreEvaluate(Box<dyn PreEvaluateHook>),
    PostEvaluate(Box<dyn PostEvaluateHook>),
    OnDeny(Box<dyn DecisionHook>),
    OnEscalationRequired(Box<dyn DecisionHook>),
}

impl Hook {
    pub fn event(&self) -> HookEvent {
        match self {
            Hook::PreEvaluate(_) => HookEvent::PreEvaluate,
            Hook::PostEvaluate(_) => HookEvent::PostEvaluate,
            Hook::OnDeny(_) => HookEvent::OnDeny,
            Hook::OnEscalationRequired(_) => HookEvent::OnEscalationRequired,
        }
    }
}

impl std::fmt::Debug for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Hook").field(&self.event()).finish()
    }
}
