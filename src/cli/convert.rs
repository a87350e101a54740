//! conversion helpers from library types to CLI output data

use crate::conditions::{
    Condition, ConditionTemplate, ConditionTypeRegistry, OrCondition, Parameter, ParameterType,
};
use crate::script::Script;

use super::output::{ClauseData, ConditionData, ParameterData, ScriptData, TypeData};

pub fn script_data(script: &Script, registry: &dyn ConditionTypeRegistry) -> ScriptData {
    ScriptData {
        name: script.name.clone(),
        comment: script.comment.clone(),
        active: script.active,
        one_shot: script.one_shot,
        subroutine: script.subroutine,
        expression: script.conditions().display(registry).to_string(),
        clauses: script
            .conditions()
            .iter()
            .map(|clause| clause_data(clause, registry))
            .collect(),
    }
}

fn clause_data(clause: &OrCondition, registry: &dyn ConditionTypeRegistry) -> ClauseData {
    ClauseData {
        conditions: clause
            .conditions()
            .iter()
            .map(|c| condition_data(c, registry))
            .collect(),
    }
}

fn condition_data(condition: &Condition, registry: &dyn ConditionTypeRegistry) -> ConditionData {
    let ty = condition.condition_type();
    ConditionData {
        type_id: ty.as_i32(),
        name: registry.template(ty).map(|t| t.internal_name.clone()),
        params: condition.params().iter().map(parameter_data).collect(),
    }
}

fn parameter_data(param: &Parameter) -> ParameterData {
    ParameterData {
        kind: param.kind.name(),
        int: param.int_value,
        real: param.real_value,
        string: param.string_value.clone(),
        coord: (param.kind == ParameterType::Coord3d)
            .then(|| [param.coord.x, param.coord.y, param.coord.z]),
        display: param.to_string(),
    }
}

pub fn type_data(template: &ConditionTemplate) -> TypeData {
    TypeData {
        id: template.id.as_i32(),
        name: template.internal_name.clone(),
        params: template.params.iter().map(|p| p.name()).collect(),
    }
}
