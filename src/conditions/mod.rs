//! trigger condition trees
//!
//! a script's trigger is an OR of AND-chains:
//! - [`Condition`]: one typed test with its parameters
//! - [`OrCondition`]: one clause, the AND of its conditions
//! - [`OrChain`]: the OR of its clauses
//!
//! parameter shapes come from a [`ConditionTypeRegistry`]. trees can be
//! duplicated, or duplicated and qualified for a concrete team/player, and
//! loaded from `OrCondition`/`Condition` chunks.

mod condition;
mod or_condition;
mod parameter;
mod registry;
mod types;

pub use condition::{
    duplicate_chain, duplicate_chain_and_qualify, Condition, ConditionDisplay,
    ConditionParseTarget, CONDITION_LABEL, CONDITION_VERSION, CONDITION_VERSION_NAMED,
};
pub use or_condition::{
    OrChain, OrChainDisplay, OrCondition, OR_CONDITION_LABEL, OR_CONDITION_VERSION,
};
pub use parameter::{Coord3D, Parameter, ParameterType, Qualifier, THIS_TEAM};
pub use registry::{ConditionTemplate, ConditionTypeRegistry, TemplateRegistry};
pub use types::{ConditionError, ConditionType, MAX_CONDITION_PARAMETERS};
