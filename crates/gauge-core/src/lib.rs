//! # gauge-core
//!
//! The ordered, fail-closed policy evaluation runtime for Gauge.
//!
//! This crate provides:
//! - The `Policy` trait and the typed hook traits (`PreEvaluateHook`,
//!   `DecisionHook`, `PostEvaluateHook`)
//! - The `PolicyEngine` that runs registered policies in order and
//!   dispatches hooks around them
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gauge_core::{Hook, PolicyEngine};
//!
//! let mut engine = PolicyEngine::new();
//! engine.register_policy(Box::new(my_policy));
//! engine.register_hook(Hook::OnDeny(Box::new(my_alerting_hook)));
//! let outcome = engine.check(&ctx);
//! ```

pub mod engine;
pub mod traits;

pub use engine::PolicyEngine;
pub use traits::{DecisionHook, Hook, HookEvent, Policy, PostEvaluateHook, PreEvaluateHook};
