//! condition parameters
//!
//! a parameter is a plain owned value: `Clone` is a deep copy. the kind decides
//! which of the value fields is meaningful and how qualification rewrites it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chunk::{ChunkError, DataChunkInput, DataChunkOutput};

/// team name that always refers to the team running the script
pub const THIS_TEAM: &str = "<This Team>";

/// parameter kinds, numbered as in scenario files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    Int = 0,
    Real = 1,
    Script = 2,
    Team = 3,
    Counter = 4,
    Flag = 5,
    Comparison = 6,
    Waypoint = 7,
    Boolean = 8,
    TriggerArea = 9,
    TextString = 10,
    Side = 11,
    Sound = 12,
    ScriptSubroutine = 13,
    Unit = 14,
    ObjectType = 15,
    Coord3d = 16,
    Angle = 17,
    TeamState = 18,
    Relation = 19,
    AiMood = 20,
    Dialog = 21,
    Music = 22,
    Movie = 23,
    WaypointPath = 24,
    LocalizedText = 25,
    Bridge = 26,
    KindOfParam = 27,
    AttackPrioritySet = 28,
    RadarEventType = 29,
    SpecialPower = 30,
    Science = 31,
    Upgrade = 32,
    CommandButtonAbility = 33,
    Boundary = 34,
    Buildable = 35,
    SurfacesAllowed = 36,
    ShakeIntensity = 37,
}

impl ParameterType {
    pub const ALL: [ParameterType; 38] = [
        Self::Int,
        Self::Real,
        Self::Script,
        Self::Team,
        Self::Counter,
        Self::Flag,
        Self::Comparison,
        Self::Waypoint,
        Self::Boolean,
        Self::TriggerArea,
        Self::TextString,
        Self::Side,
        Self::Sound,
        Self::ScriptSubroutine,
        Self::Unit,
        Self::ObjectType,
        Self::Coord3d,
        Self::Angle,
        Self::TeamState,
        Self::Relation,
        Self::AiMood,
        Self::Dialog,
        Self::Music,
        Self::Movie,
        Self::WaypointPath,
        Self::LocalizedText,
        Self::Bridge,
        Self::KindOfParam,
        Self::AttackPrioritySet,
        Self::RadarEventType,
        Self::SpecialPower,
        Self::Science,
        Self::Upgrade,
        Self::CommandButtonAbility,
        Self::Boundary,
        Self::Buildable,
        Self::SurfacesAllowed,
        Self::ShakeIntensity,
    ];

    pub fn from_i32(value: i32) -> Option<Self> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// snake_case name, as used in config files
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Real => "real",
            Self::Script => "script",
            Self::Team => "team",
            Self::Counter => "counter",
            Self::Flag => "flag",
            Self::Comparison => "comparison",
            Self::Waypoint => "waypoint",
            Self::Boolean => "boolean",
            Self::TriggerArea => "trigger_area",
            Self::TextString => "text_string",
            Self::Side => "side",
            Self::Sound => "sound",
            Self::ScriptSubroutine => "script_subroutine",
            Self::Unit => "unit",
            Self::ObjectType => "object_type",
            Self::Coord3d => "coord3d",
            Self::Angle => "angle",
            Self::TeamState => "team_state",
            Self::Relation => "relation",
            Self::AiMood => "ai_mood",
            Self::Dialog => "dialog",
            Self::Music => "music",
            Self::Movie => "movie",
            Self::WaypointPath => "waypoint_path",
            Self::LocalizedText => "localized_text",
            Self::Bridge => "bridge",
            Self::KindOfParam => "kind_of_param",
            Self::AttackPrioritySet => "attack_priority_set",
            Self::RadarEventType => "radar_event_type",
            Self::SpecialPower => "special_power",
            Self::Science => "science",
            Self::Upgrade => "upgrade",
            Self::CommandButtonAbility => "command_button_ability",
            Self::Boundary => "boundary",
            Self::Buildable => "buildable",
            Self::SurfacesAllowed => "surfaces_allowed",
            Self::ShakeIntensity => "shake_intensity",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == s)
    }

    fn is_integral(self) -> bool {
        matches!(
            self,
            Self::Int
                | Self::Comparison
                | Self::Boolean
                | Self::Relation
                | Self::AiMood
                | Self::KindOfParam
                | Self::RadarEventType
                | Self::Boundary
                | Self::Buildable
                | Self::SurfacesAllowed
                | Self::ShakeIntensity
        )
    }

    fn is_real(self) -> bool {
        matches!(self, Self::Real | Self::Angle)
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coord3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// the three scope strings used to instantiate a template script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Qualifier {
    /// suffix appended to team, script, counter and flag names
    pub qualifier: String,
    /// side name used in the template
    pub player_template: String,
    /// side name that replaces `player_template`
    pub player: String,
}

impl Qualifier {
    pub fn new(
        qualifier: impl Into<String>,
        player_template: impl Into<String>,
        player: impl Into<String>,
    ) -> Self {
        Self {
            qualifier: qualifier.into(),
            player_template: player_template.into(),
            player: player.into(),
        }
    }

    /// qualified form of a script name
    pub fn script_name(&self, name: &str) -> String {
        format!("{}{}", name, self.qualifier)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub kind: ParameterType,
    pub int_value: i32,
    pub real_value: f32,
    pub string_value: String,
    pub coord: Coord3D,
}

impl Parameter {
    /// zero-valued parameter of the given kind
    pub fn new(kind: ParameterType) -> Self {
        Self {
            kind,
            int_value: 0,
            real_value: 0.0,
            string_value: String::new(),
            coord: Coord3D::default(),
        }
    }

    pub fn with_int(kind: ParameterType, value: i32) -> Self {
        Self {
            int_value: value,
            ..Self::new(kind)
        }
    }

    pub fn with_real(kind: ParameterType, value: f32) -> Self {
        Self {
            real_value: value,
            ..Self::new(kind)
        }
    }

    pub fn with_string(kind: ParameterType, value: impl Into<String>) -> Self {
        Self {
            string_value: value.into(),
            ..Self::new(kind)
        }
    }

    pub fn with_coord(x: f32, y: f32, z: f32) -> Self {
        Self {
            coord: Coord3D { x, y, z },
            ..Self::new(ParameterType::Coord3d)
        }
    }

    /// rewrite a template-relative value for a concrete instance, in place
    pub fn qualify(&mut self, q: &Qualifier) {
        match self.kind {
            ParameterType::Side => {
                if self.string_value == q.player_template {
                    self.string_value = q.player.clone();
                }
            }
            ParameterType::Team => {
                if self.string_value != THIS_TEAM {
                    self.string_value.push_str(&q.qualifier);
                }
            }
            ParameterType::Script
            | ParameterType::ScriptSubroutine
            | ParameterType::Counter
            | ParameterType::Flag => {
                self.string_value.push_str(&q.qualifier);
            }
            _ => {}
        }
    }

    /// read one parameter in its scenario file form
    pub fn read(input: &mut DataChunkInput) -> Result<Self, ChunkError> {
        let raw = input.read_i32()?;
        let kind = ParameterType::from_i32(raw).ok_or(ChunkError::UnknownParameterType(raw))?;

        let mut param = Self::new(kind);
        if kind == ParameterType::Coord3d {
            param.coord.x = input.read_real()?;
            param.coord.y = input.read_real()?;
            param.coord.z = input.read_real()?;
        } else {
            param.int_value = input.read_i32()?;
            param.real_value = input.read_real()?;
            param.string_value = input.read_ascii_string()?;
        }

        Ok(param)
    }

    pub fn write(&self, out: &mut DataChunkOutput) {
        out.write_i32(self.kind.as_i32());
        if self.kind == ParameterType::Coord3d {
            out.write_real(self.coord.x);
            out.write_real(self.coord.y);
            out.write_real(self.coord.z);
        } else {
            out.write_i32(self.int_value);
            out.write_real(self.real_value);
            out.write_ascii_string(&self.string_value);
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParameterType::Coord3d => {
                write!(f, "({}, {}, {})", self.coord.x, self.coord.y, self.coord.z)
            }
            ParameterType::Boolean => write!(f, "{}", self.int_value != 0),
            ParameterType::Comparison => match comparison_symbol(self.int_value) {
                Some(op) => write!(f, "{}", op),
                None => write!(f, "cmp#{}", self.int_value),
            },
            kind if kind.is_integral() => write!(f, "{}", self.int_value),
            kind if kind.is_real() => write!(f, "{}", self.real_value),
            _ => write!(f, "\"{}\"", self.string_value),
        }
    }
}

/// comparison operators, in their stored order
fn comparison_symbol(value: i32) -> Option<&'static str> {
    match value {
        0 => Some("<"),
        1 => Some("<="),
        2 => Some("=="),
        3 => Some(">="),
        4 => Some(">"),
        5 => Some("!="),
        _ => None,
    }
}
