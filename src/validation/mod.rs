//! Validation of the payloads states are entered with.
//!
//! Payloads are opaque to the state machine. A state that cares about the
//! shape of its entry arguments attaches [`ArgumentRules`] to its definition;
//! the machine checks them before touching the stack and reports every
//! violated rule at once through Stillwater's `Validation`.
//!
//! # Example
//!
//! ```rust
//! use stagehand::validation::{ArgumentRules, ArgumentRulesBuilder};
//! use serde_json::json;
//!
//! let rules: ArgumentRules<_> = ArgumentRulesBuilder::<serde_json::Value>::new()
//!     .require_field("spawn_point")
//!     .require_pred(|args| args.is_object(), "payload must be an object".to_string())
//!     .build();
//!
//! assert!(rules.validate(&json!({ "spawn_point": [0, 1, 0] })).is_success());
//! assert_eq!(rules.violations(&json!([])).len(), 2);
//! ```

pub mod builder;
pub mod rules;
pub mod violations;

// Re-export commonly used types
pub use builder::ArgumentRulesBuilder;
pub use rules::ArgumentRules;
pub use violations::ArgumentViolation;
