//! condition type registry
//!
//! maps a condition type tag to its internal name and parameter shape.
//! nodes never hard-code shapes; they ask a registry passed in by the caller.

use std::collections::BTreeMap;

use strsim::levenshtein;

use super::parameter::ParameterType;
use super::types::{ConditionError, ConditionType, MAX_CONDITION_PARAMETERS};

/// describes one condition type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionTemplate {
    pub id: ConditionType,
    /// stable name written next to the tag so files survive renumbering
    pub internal_name: String,
    pub params: Vec<ParameterType>,
}

impl ConditionTemplate {
    pub fn new(id: ConditionType, internal_name: impl Into<String>, params: Vec<ParameterType>) -> Self {
        Self {
            id,
            internal_name: internal_name.into(),
            params,
        }
    }
}

/// lookup of condition shapes by tag or by internal name
pub trait ConditionTypeRegistry {
    fn template(&self, ty: ConditionType) -> Option<&ConditionTemplate>;

    fn find_by_name(&self, name: &str) -> Option<&ConditionTemplate>;

    /// parameter kinds for `ty`, in slot order
    fn shape_of(&self, ty: ConditionType) -> Option<&[ParameterType]> {
        self.template(ty).map(|t| t.params.as_slice())
    }
}

/// in-memory registry, ordered by tag
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<ConditionType, ConditionTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// registry with the standard trigger condition table
    pub fn builtin() -> Self {
        use ParameterType as P;

        let table = [
            (ConditionType::FALSE, "CONDITION_FALSE", vec![]),
            (
                ConditionType::COUNTER,
                "COUNTER",
                vec![P::Counter, P::Comparison, P::Int],
            ),
            (ConditionType::FLAG, "FLAG", vec![P::Flag, P::Boolean]),
            (ConditionType::TRUE, "CONDITION_TRUE", vec![]),
            (ConditionType::TIMER_EXPIRED, "TIMER_EXPIRED", vec![P::Counter]),
            (
                ConditionType::PLAYER_ALL_DESTROYED,
                "PLAYER_ALL_DESTROYED",
                vec![P::Side],
            ),
            (
                ConditionType::PLAYER_ALL_BUILDFACILITIES_DESTROYED,
                "PLAYER_ALL_BUILDFACILITIES_DESTROYED",
                vec![P::Side],
            ),
            (
                ConditionType::TEAM_INSIDE_AREA_PARTIALLY,
                "TEAM_INSIDE_AREA_PARTIALLY",
                vec![P::Team, P::TriggerArea, P::SurfacesAllowed],
            ),
            (ConditionType::TEAM_DESTROYED, "TEAM_DESTROYED", vec![P::Team]),
            (
                ConditionType::CAMERA_MOVEMENT_FINISHED,
                "CAMERA_MOVEMENT_FINISHED",
                vec![],
            ),
            (ConditionType::TEAM_HAS_UNITS, "TEAM_HAS_UNITS", vec![P::Team]),
            (
                ConditionType::TEAM_STATE_IS,
                "TEAM_STATE_IS",
                vec![P::Team, P::TeamState],
            ),
            (
                ConditionType::TEAM_STATE_IS_NOT,
                "TEAM_STATE_IS_NOT",
                vec![P::Team, P::TeamState],
            ),
            (
                ConditionType::NAMED_INSIDE_AREA,
                "NAMED_INSIDE_AREA",
                vec![P::Unit, P::TriggerArea],
            ),
            (
                ConditionType::NAMED_OUTSIDE_AREA,
                "NAMED_OUTSIDE_AREA",
                vec![P::Unit, P::TriggerArea],
            ),
            (ConditionType::NAMED_DESTROYED, "NAMED_DESTROYED", vec![P::Unit]),
            (
                ConditionType::NAMED_NOT_DESTROYED,
                "NAMED_NOT_DESTROYED",
                vec![P::Unit],
            ),
            (
                ConditionType::TEAM_INSIDE_AREA_ENTIRELY,
                "TEAM_INSIDE_AREA_ENTIRELY",
                vec![P::Team, P::TriggerArea, P::SurfacesAllowed],
            ),
            (
                ConditionType::TEAM_OUTSIDE_AREA_ENTIRELY,
                "TEAM_OUTSIDE_AREA_ENTIRELY",
                vec![P::Team, P::TriggerArea, P::SurfacesAllowed],
            ),
        ];

        let templates = table
            .into_iter()
            .map(|(id, name, params)| (id, ConditionTemplate::new(id, name, params)))
            .collect();

        Self { templates }
    }

    /// add or replace a template, returning the one it replaced
    ///
    /// internal names stay unique: a name held by another tag is rejected.
    pub fn insert(
        &mut self,
        template: ConditionTemplate,
    ) -> Result<Option<ConditionTemplate>, ConditionError> {
        if template.params.len() > MAX_CONDITION_PARAMETERS {
            return Err(ConditionError::TooManyParameters {
                name: template.internal_name,
                count: template.params.len(),
            });
        }
        if let Some(existing) = self
            .templates
            .values()
            .find(|t| t.id != template.id && t.internal_name == template.internal_name)
        {
            return Err(ConditionError::DuplicateName {
                name: template.internal_name,
                existing: existing.id,
            });
        }
        Ok(self.templates.insert(template.id, template))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// templates in tag order
    pub fn iter(&self) -> impl Iterator<Item = &ConditionTemplate> {
        self.templates.values()
    }

    /// registered names closest to `name` (case-insensitive), best first
    pub fn suggest(&self, name: &str, max_distance: usize) -> Vec<String> {
        let query = name.to_lowercase();

        let mut matches: Vec<_> = self
            .templates
            .values()
            .map(|t| {
                let distance = levenshtein(&query, &t.internal_name.to_lowercase());
                (t, distance)
            })
            .filter(|(_, distance)| *distance <= max_distance)
            .collect();

        matches.sort_by(|a, b| {
            a.1.cmp(&b.1)
                .then_with(|| a.0.internal_name.cmp(&b.0.internal_name))
        });

        matches
            .into_iter()
            .map(|(t, _)| t.internal_name.clone())
            .collect()
    }
}

impl ConditionTypeRegistry for TemplateRegistry {
    fn template(&self, ty: ConditionType) -> Option<&ConditionTemplate> {
        self.templates.get(&ty)
    }

    fn find_by_name(&self, name: &str) -> Option<&ConditionTemplate> {
        self.templates.values().find(|t| t.internal_name == name)
    }
}
