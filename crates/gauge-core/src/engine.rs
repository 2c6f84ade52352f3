//! The Gauge policy engine: an ordered, fail-closed rule runner.
//!
//! One evaluation pass:
//!
//!   pre-evaluate hooks → [policy → on-deny / on-escalation hooks]* → post-evaluate hooks
//!
//! Every enabled policy contributes exactly one result. A policy that returns
//! `Err` or panics is recorded as a synthetic `deny` (fail closed), and so is
//! every policy when the context has a blank action or resource; a hook
//! that fails is logged and ignored (fail open). Neither ever aborts the pass.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde_json::Value;
use tracing::{debug, error, info, warn};

use gauge_contracts::{
    error::{GaugeError, GaugeResult},
    policy::{CheckOutcome, PolicyContext, PolicyResult},
};

use crate::traits::{DecisionHook, Hook, HookEvent, Policy, PostEvaluateHook, PreEvaluateHook};

struct RegisteredPolicy {
    policy: Box<dyn Policy>,
    enabled: bool,
}

#[derive(Default)]
struct HookRegistry {
    pre_evaluate: Vec<Box<dyn PreEvaluateHook>>,
    post_evaluate: Vec<Box<dyn PostEvaluateHook>>,
    on_deny: Vec<Box<dyn DecisionHook>>,
    on_escalation_required: Vec<Box<dyn DecisionHook>>,
}

/// Holds the ordered policy list and hook registries for one engine.
///
/// Registration takes `&mut self` and evaluation `&self`, so registering
/// while a pass is in flight requires the caller to serialize access (e.g.
/// an `RwLock<PolicyEngine>`).
#[derive(Default)]
pub struct PolicyEngine {
    policies: Vec<RegisteredPolicy>,
    hooks: HookRegistry,
}

impl PolicyEngine {
    /// Create an engine with no policies and no hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `policy` to the evaluation order. It starts enabled.
    pub fn register_policy(&mut self, policy: Box<dyn Policy>) {
        info!(
            policy_id = %policy.id(),
            category = ?policy.category(),
            position = self.policies.len(),
            "registered policy"
        );
        self.policies.push(RegisteredPolicy { policy, enabled: true });
    }

    /// Enable or disable every registered policy with `policy_id`.
    ///
    /// Disabled policies stay registered and keep their position but are
    /// skipped during evaluation.
    pub fn set_enabled(&mut self, policy_id: &str, enabled: bool) -> GaugeResult<()> {
        let mut found = false;
        for entry in self.policies.iter_mut().filter(|p| p.policy.id() == policy_id) {
            entry.enabled = enabled;
            found = true;
        }
        if !found {
            return Err(GaugeError::UnknownPolicy { policy_id: policy_id.to_string() });
        }
        debug!(policy_id, enabled, "policy enablement changed");
        Ok(())
    }

    /// `Some(enabled)` for a registered policy, `None` otherwise.
    pub fn is_enabled(&self, policy_id: &str) -> Option<bool> {
        self.policies
            .iter()
            .find(|p| p.policy.id() == policy_id)
            .map(|p| p.enabled)
    }

    /// Subscribe a hook. Hooks for the same event run in registration order.
    pub fn register_hook(&mut self, hook: Hook) {
        debug!(event = %hook.event(), "registered hook");
        match hook {
            Hook::PreEvaluate(h) => self.hooks.pre_evaluate.push(h),
            Hook::PostEvaluate(h) => self.hooks.post_evaluate.push(h),
            Hook::OnDeny(h) => self.hooks.on_deny.push(h),
            Hook::OnEscalationRequired(h) => self.hooks.on_escalation_required.push(h),
        }
    }

    /// Number of hooks subscribed to `event`.
    pub fn hook_count(&self, event: HookEvent) -> usize {
        match event {
            HookEvent::PreEvaluate => self.hooks.pre_evaluate.len(),
            HookEvent::PostEvaluate => self.hooks.post_evaluate.len(),
            HookEvent::OnDeny => self.hooks.on_deny.len(),
            HookEvent::OnEscalationRequired => self.hooks.on_escalation_required.len(),
        }
    }

    /// Identifiers of all registered policies, in evaluation order.
    pub fn policy_ids(&self) -> Vec<&str> {
        self.policies.iter().map(|p| p.policy.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Number of policies that will produce a result on the next pass.
    pub fn enabled_count(&self) -> usize {
        self.policies.iter().filter(|p| p.enabled).count()
    }

    /// Evaluate every enabled policy against `ctx`, in registration order.
    ///
    /// Always returns exactly `enabled_count()` results.
    pub fn evaluate(&self, ctx: &PolicyContext) -> Vec<PolicyResult> {
        debug!(
            actor = %ctx.actor,
            action = %ctx.action,
            resource = %ctx.resource,
            score = ctx.current_score,
            "evaluation pass starting"
        );

        for hook in &self.hooks.pre_evaluate {
            run_hook(HookEvent::PreEvaluate, || hook.pre_evaluate(ctx));
        }

        let invalid = ctx.validate().err().map(|e| e.to_string());
        if let Some(message) = &invalid {
            warn!(error = %message, "rejecting invalid context");
        }

        let mut results = Vec::with_capacity(self.enabled_count());
        for entry in self.policies.iter().filter(|p| p.enabled) {
            let policy = entry.policy.as_ref();
            let result = match &invalid {
                Some(message) => reject_context(policy, message),
                None => evaluate_policy(policy, ctx),
            };

            debug!(
                policy_id = %result.policy_id,
                decision = %result.decision,
                escalation = result.requires_escalation,
                "policy evaluated"
            );

            if result.is_deny() {
                warn!(policy_id = %result.policy_id, reason = %result.reason, "policy denied action");
                for hook in &self.hooks.on_deny {
                    run_hook(HookEvent::OnDeny, || hook.on_decision(policy, ctx, &result));
                }
            }

            if result.requires_escalation {
                warn!(policy_id = %result.policy_id, reason = %result.reason, "escalation required");
                for hook in &self.hooks.on_escalation_required {
                    run_hook(HookEvent::OnEscalationRequired, || hook.on_decision(policy, ctx, &result));
                }
            }

            results.push(result);
        }

        for hook in &self.hooks.post_evaluate {
            run_hook(HookEvent::PostEvaluate, || hook.post_evaluate(ctx, &results));
        }

        results
    }

    /// Evaluate and combine: allowed iff no result is a deny.
    ///
    /// Defer and audit decisions never block. The full result list is
    /// returned either way.
    pub fn check(&self, ctx: &PolicyContext) -> CheckOutcome {
        let outcome = CheckOutcome::from_results(self.evaluate(ctx));
        info!(
            action = %ctx.action,
            resource = %ctx.resource,
            allowed = outcome.allowed,
            results = outcome.results.len(),
            "policy check complete"
        );
        outcome
    }
}

impl std::fmt::Debug for PolicyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyEngine")
            .field("policies", &self.policy_ids())
            .field("enabled", &self.enabled_count())
            .finish()
    }
}

/// Run one policy, converting an error or panic into a synthetic deny.
fn evaluate_policy(policy: &dyn Policy, ctx: &PolicyContext) -> PolicyResult {
    match guarded(|| policy.evaluate(ctx)) {
        Ok(result) => result,
        Err(message) => {
            error!(policy_id = %policy.id(), error = %message, "policy evaluation error");
            PolicyResult::deny(policy.id(), format!("evaluation error: {message}"))
                .with_evidence("error", Value::String(message))
        }
    }
}

/// Deny on behalf of `policy` without evaluating it.
fn reject_context(policy: &dyn Policy, message: &str) -> PolicyResult {
    PolicyResult::deny(policy.id(), format!("invalid context: {message}"))
        .with_evidence("error", Value::String(message.to_string()))
}

fn run_hook(event: HookEvent, f: impl FnOnce() -> GaugeResult<()>) {
    if let Err(message) = guarded(f) {
        let err = GaugeError::HookFailed { event: event.to_string(), reason: message };
        error!(event = %event, error = %err, "hook error");
    }
}

fn guarded<T>(f: impl FnOnce() -> GaugeResult<T>) -> Result<T, String> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
