//! core types for the condition system

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// upper bound on parameters any condition type may declare
pub const MAX_CONDITION_PARAMETERS: usize = 12;

/// condition type tag as stored in scenario files
///
/// the meaning of a tag (name, parameter shape) lives in a
/// [`ConditionTypeRegistry`](super::ConditionTypeRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionType(pub i32);

impl ConditionType {
    pub const FALSE: Self = Self(0);
    pub const COUNTER: Self = Self(1);
    pub const FLAG: Self = Self(2);
    pub const TRUE: Self = Self(3);
    pub const TIMER_EXPIRED: Self = Self(4);
    pub const PLAYER_ALL_DESTROYED: Self = Self(5);
    pub const PLAYER_ALL_BUILDFACILITIES_DESTROYED: Self = Self(6);
    pub const TEAM_INSIDE_AREA_PARTIALLY: Self = Self(7);
    pub const TEAM_DESTROYED: Self = Self(8);
    pub const CAMERA_MOVEMENT_FINISHED: Self = Self(9);
    pub const TEAM_HAS_UNITS: Self = Self(10);
    pub const TEAM_STATE_IS: Self = Self(11);
    pub const TEAM_STATE_IS_NOT: Self = Self(12);
    pub const NAMED_INSIDE_AREA: Self = Self(13);
    pub const NAMED_OUTSIDE_AREA: Self = Self(14);
    pub const NAMED_DESTROYED: Self = Self(15);
    pub const NAMED_NOT_DESTROYED: Self = Self(16);
    pub const TEAM_INSIDE_AREA_ENTIRELY: Self = Self(17);
    pub const TEAM_OUTSIDE_AREA_ENTIRELY: Self = Self(18);

    pub fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// errors raised while building condition nodes or registry entries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    #[error("unknown condition type: {0}")]
    UnknownConditionType(ConditionType),

    #[error(
        "condition type '{name}' declares {count} parameters (max {max})",
        max = MAX_CONDITION_PARAMETERS
    )]
    TooManyParameters { name: String, count: usize },

    #[error("condition type name '{name}' is already used by type {existing}")]
    DuplicateName {
        name: String,
        existing: ConditionType,
    },
}
