//! scripts: a named trigger expression plus its flags
//!
//! only the parts a trigger needs are kept; action chunks inside a script are
//! skipped by the reader.

use std::any::Any;
use std::rc::Rc;

use tracing::{debug, info};

use crate::chunk::{ChunkError, DataChunkInfo, DataChunkInput, DataChunkOutput};
use crate::conditions::{ConditionTypeRegistry, OrChain, OrCondition, Qualifier, OR_CONDITION_LABEL};

pub const SCRIPT_LABEL: &str = "Script";
pub const SCRIPT_VERSION: u16 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub name: String,
    pub comment: String,
    pub active: bool,
    pub one_shot: bool,
    pub subroutine: bool,
    conditions: OrChain,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            name: String::new(),
            comment: String::new(),
            active: true,
            one_shot: true,
            subroutine: false,
            conditions: OrChain::new(),
        }
    }
}

impl Script {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn conditions(&self) -> &OrChain {
        &self.conditions
    }

    pub fn conditions_mut(&mut self) -> &mut OrChain {
        &mut self.conditions
    }

    /// replace the trigger expression, dropping the old one
    pub fn set_conditions(&mut self, conditions: OrChain) {
        self.conditions = conditions;
    }

    /// append a clause at the tail of the OR-chain
    pub fn push_or_condition(&mut self, clause: OrCondition) {
        self.conditions.push(clause);
    }

    pub fn duplicate(&self) -> Self {
        Self {
            conditions: self.conditions.duplicate(),
            ..self.without_conditions()
        }
    }

    /// copy for a concrete instance: the name and every parameter are qualified
    pub fn duplicate_and_qualify(&self, q: &Qualifier) -> Self {
        Self {
            name: q.script_name(&self.name),
            conditions: self.conditions.duplicate_and_qualify(q),
            ..self.without_conditions()
        }
    }

    fn without_conditions(&self) -> Self {
        Self {
            name: self.name.clone(),
            comment: self.comment.clone(),
            active: self.active,
            one_shot: self.one_shot,
            subroutine: self.subroutine,
            conditions: OrChain::new(),
        }
    }

    /// chunk parser for a top-level `Script`
    ///
    /// the receiving object must be a [`ScriptListParseTarget`].
    pub fn parse_script_chunk(
        input: &mut DataChunkInput,
        info: &DataChunkInfo,
        target: &mut dyn Any,
    ) -> Result<(), ChunkError> {
        let target = target
            .downcast_mut::<ScriptListParseTarget>()
            .ok_or(ChunkError::UnexpectedTarget("ScriptListParseTarget"))?;

        let script = Script {
            name: input.read_ascii_string()?,
            comment: input.read_ascii_string()?,
            active: input.read_byte()? != 0,
            one_shot: input.read_byte()? != 0,
            subroutine: input.read_byte()? != 0,
            conditions: OrChain::new(),
        };

        input.register_parser(
            OR_CONDITION_LABEL,
            &info.label,
            OrCondition::parse_or_condition_chunk,
        );

        let mut nested = ScriptParseTarget {
            script,
            registry: Rc::clone(&target.registry),
        };
        input.parse(&mut nested)?;

        debug!(
            script = %nested.script.name,
            clauses = nested.script.conditions.len(),
            "parsed script"
        );
        target.scripts.push(nested.script);
        Ok(())
    }

    pub fn write(&self, out: &mut DataChunkOutput, registry: &dyn ConditionTypeRegistry) {
        out.open_data_chunk(SCRIPT_LABEL, SCRIPT_VERSION);
        out.write_ascii_string(&self.name);
        out.write_ascii_string(&self.comment);
        out.write_byte(self.active as u8);
        out.write_byte(self.one_shot as u8);
        out.write_byte(self.subroutine as u8);
        for clause in &self.conditions {
            clause.write(out, registry);
        }
        out.close_data_chunk();
    }
}

/// receiving object for [`OrCondition::parse_or_condition_chunk`]
pub struct ScriptParseTarget {
    pub script: Script,
    pub registry: Rc<dyn ConditionTypeRegistry>,
}

impl ScriptParseTarget {
    pub fn new(script: Script, registry: Rc<dyn ConditionTypeRegistry>) -> Self {
        Self { script, registry }
    }
}

/// receiving object for [`Script::parse_script_chunk`]
pub struct ScriptListParseTarget {
    pub scripts: Vec<Script>,
    pub registry: Rc<dyn ConditionTypeRegistry>,
}

/// parse every top-level `Script` chunk in a chunk file
pub fn load_scripts(
    bytes: Vec<u8>,
    registry: Rc<dyn ConditionTypeRegistry>,
) -> Result<Vec<Script>, ChunkError> {
    let mut input = DataChunkInput::new(bytes)?;
    input.register_parser(SCRIPT_LABEL, "", Script::parse_script_chunk);

    let mut target = ScriptListParseTarget {
        scripts: Vec::new(),
        registry,
    };
    input.parse(&mut target)?;

    info!(scripts = target.scripts.len(), "loaded scripts");
    Ok(target.scripts)
}

/// write scripts as a chunk file readable by [`load_scripts`]
pub fn save_scripts(scripts: &[Script], registry: &dyn ConditionTypeRegistry) -> Vec<u8> {
    let mut out = DataChunkOutput::new();
    for script in scripts {
        script.write(&mut out, registry);
    }
    out.finish()
}
