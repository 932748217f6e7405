//! Condition evaluation subsystem.
//!
//! # Data Flow
//! ```text
//! Condition strings (from a rule-set event)
//!     → evaluator.rs (split on operator token, resolve operands)
//!     → resolver (Body.* paths against the inbound JSON)
//!     → operators.rs (binary predicate)
//!     → bool (fail-fast AND across the condition list)
//! ```
//!
//! # Design Decisions
//! - Operator tokens are scanned in registration order (deterministic;
//!   re-registering a token replaces its predicate without moving it)
//! - Operand grammar: `Header.<name>`, `Body.<path>`, or a literal string
//! - A header that is absent resolves to the empty string, never an error
//! - First false or erroring condition short-circuits the whole list

pub mod evaluator;
pub mod operators;

pub use evaluator::{ConditionError, Evaluator, OperatorError, OperatorFn};
