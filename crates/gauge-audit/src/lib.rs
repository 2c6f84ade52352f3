//! # gauge-audit
//!
//! Append-only, SHA-256 hash-chained audit trail of policy evaluation passes.
//!
//! ## Overview
//!
//! Every evaluation pass is wrapped in an `AuditEvent` that links to the
//! previous event via its hash. Altering any stored event breaks the chain
//! and is detected by `verify_chain`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gauge_audit::AuditTrail;
//! use gauge_core::Hook;
//!
//! let trail = AuditTrail::new("release-42");
//! engine.register_hook(Hook::PostEvaluate(Box::new(trail.clone())));
//! engine.check(&ctx);
//!
//! assert!(trail.verify_integrity());
//! let log = trail.export_log()?;
//! ```

pub mod chain;
pub mod event;
pub mod trail;

pub use chain::{hash_event, verify_chain};
pub use event::{AuditEvent, AuditLog};
pub use trail::AuditTrail;

// ── Tests ─────────────────────────────────────────────────────────────────────
