//! condition nodes and AND-chains
//!
//! an AND-chain is an ordered `Vec<Condition>` owned by its
//! [`OrCondition`](super::OrCondition); dropping the vector releases every node
//! and parameter exactly once, without recursion.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use super::or_condition::OrCondition;
use super::parameter::{Parameter, Qualifier};
use super::registry::ConditionTypeRegistry;
use super::types::{ConditionError, ConditionType, MAX_CONDITION_PARAMETERS};
use crate::chunk::{ChunkError, DataChunkInfo, DataChunkInput, DataChunkOutput};

/// chunk label for a condition
pub const CONDITION_LABEL: &str = "Condition";

/// from this version on, the internal type name follows the tag
pub const CONDITION_VERSION_NAMED: u16 = 4;

/// version written by [`Condition::write`]
pub const CONDITION_VERSION: u16 = CONDITION_VERSION_NAMED;

/// a single typed test with its parameters
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Condition {
    condition_type: ConditionType,
    /// exactly one entry per slot of the type's shape
    params: Vec<Parameter>,
    pub has_warnings: bool,
    pub custom_data: i32,
    pub reserved: i32,
}

impl Condition {
    /// node of type `ty` with default-valued parameters for its shape
    pub fn new(ty: ConditionType, registry: &dyn ConditionTypeRegistry) -> Result<Self, ConditionError> {
        let mut condition = Self::default();
        condition.set_condition_type(ty, registry)?;
        Ok(condition)
    }

    pub fn condition_type(&self) -> ConditionType {
        self.condition_type
    }

    /// switch type and re-provision parameters from the registry
    ///
    /// an unknown type leaves the node unchanged.
    pub fn set_condition_type(
        &mut self,
        ty: ConditionType,
        registry: &dyn ConditionTypeRegistry,
    ) -> Result<(), ConditionError> {
        let shape = registry
            .shape_of(ty)
            .ok_or(ConditionError::UnknownConditionType(ty))?;

        if shape.len() > MAX_CONDITION_PARAMETERS {
            return Err(ConditionError::TooManyParameters {
                name: registry
                    .template(ty)
                    .map(|t| t.internal_name.clone())
                    .unwrap_or_else(|| ty.to_string()),
                count: shape.len(),
            });
        }

        self.params = shape.iter().copied().map(Parameter::new).collect();
        self.condition_type = ty;
        Ok(())
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn num_params(&self) -> usize {
        self.params.len()
    }

    pub fn param(&self, index: usize) -> Option<&Parameter> {
        self.params.get(index)
    }

    pub fn param_mut(&mut self, index: usize) -> Option<&mut Parameter> {
        self.params.get_mut(index)
    }

    /// builder-style parameter assignment, ignored when `index` is out of range
    pub fn with_param(mut self, index: usize, param: Parameter) -> Self {
        if let Some(slot) = self.params.get_mut(index) {
            *slot = param;
        }
        self
    }

    /// deep copy of the type and parameters
    ///
    /// `has_warnings`, `custom_data` and `reserved` start fresh on the copy.
    pub fn duplicate(&self) -> Self {
        Self {
            condition_type: self.condition_type,
            params: self.params.clone(),
            ..Self::default()
        }
    }

    /// deep copy with every parameter qualified once, in slot order
    pub fn duplicate_and_qualify(&self, q: &Qualifier) -> Self {
        let mut copy = self.duplicate();
        copy.qualify(q);
        copy
    }

    pub fn qualify(&mut self, q: &Qualifier) {
        for param in &mut self.params {
            param.qualify(q);
        }
    }

    /// render using the registry's name for the type
    pub fn display<'a>(&'a self, registry: &'a dyn ConditionTypeRegistry) -> ConditionDisplay<'a> {
        ConditionDisplay {
            condition: self,
            registry: Some(registry),
        }
    }

    /// chunk parser for a condition inside an `OrCondition`
    ///
    /// the receiving object must be a [`ConditionParseTarget`]. the node is
    /// appended to its AND-chain only after it parsed completely.
    pub fn parse_condition_chunk(
        input: &mut DataChunkInput,
        info: &DataChunkInfo,
        target: &mut dyn Any,
    ) -> Result<(), ChunkError> {
        let target = target
            .downcast_mut::<ConditionParseTarget>()
            .ok_or(ChunkError::UnexpectedTarget("ConditionParseTarget"))?;

        let condition = Self::read(input, info, target.registry.as_ref())?;
        target.or_condition.push(condition);
        Ok(())
    }

    fn read(
        input: &mut DataChunkInput,
        info: &DataChunkInfo,
        registry: &dyn ConditionTypeRegistry,
    ) -> Result<Self, ChunkError> {
        let mut ty = ConditionType(input.read_i32()?);

        if info.version >= CONDITION_VERSION_NAMED {
            let name = input.read_ascii_string()?;
            let tagged = registry.template(ty).map(|t| t.internal_name.as_str());
            if tagged != Some(name.as_str()) {
                if let Some(named) = registry.find_by_name(&name) {
                    debug!(from = %ty, to = %named.id, name = %name, "remapped condition type by name");
                    ty = named.id;
                }
            }
        }

        let mut condition = Self::new(ty, registry)?;

        let count = input.read_i32()?;
        let count = usize::try_from(count)
            .ok()
            .filter(|c| *c <= MAX_CONDITION_PARAMETERS)
            .ok_or_else(|| ChunkError::malformed(format!("bad parameter count {}", count)))?;

        let mut read = Vec::with_capacity(count);
        for _ in 0..count {
            read.push(Parameter::read(input)?);
        }

        if read.len() > condition.params.len() {
            warn!(
                condition_type = %ty,
                expected = condition.params.len(),
                found = read.len(),
                "dropping surplus condition parameters"
            );
            read.truncate(condition.params.len());
        }

        // slots not present in the file keep their defaults
        for (index, (slot, param)) in condition.params.iter_mut().zip(read).enumerate() {
            if param.kind != slot.kind {
                warn!(
                    condition_type = %ty,
                    slot = index,
                    expected = ?slot.kind,
                    found = ?param.kind,
                    "condition parameter kind does not match its type"
                );
                condition.has_warnings = true;
            }
            *slot = param;
        }

        Ok(condition)
    }

    /// write this node as a `Condition` chunk
    pub fn write(&self, out: &mut DataChunkOutput, registry: &dyn ConditionTypeRegistry) {
        out.open_data_chunk(CONDITION_LABEL, CONDITION_VERSION);
        out.write_i32(self.condition_type.as_i32());
        let name = registry
            .template(self.condition_type)
            .map(|t| t.internal_name.as_str())
            .unwrap_or_default();
        out.write_ascii_string(name);
        out.write_i32(self.params.len() as i32);
        for param in &self.params {
            param.write(out);
        }
        out.close_data_chunk();
    }
}

/// receiving object handed to [`Condition::parse_condition_chunk`]
pub struct ConditionParseTarget {
    pub or_condition: OrCondition,
    pub registry: Rc<dyn ConditionTypeRegistry>,
}

/// deep copy of an AND-chain, order preserved
pub fn duplicate_chain(chain: &[Condition]) -> Vec<Condition> {
    chain.iter().map(Condition::duplicate).collect()
}

/// deep copy of an AND-chain with every parameter qualified
pub fn duplicate_chain_and_qualify(chain: &[Condition], q: &Qualifier) -> Vec<Condition> {
    chain.iter().map(|c| c.duplicate_and_qualify(q)).collect()
}

pub struct ConditionDisplay<'a> {
    condition: &'a Condition,
    registry: Option<&'a dyn ConditionTypeRegistry>,
}

impl fmt::Display for ConditionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .registry
            .and_then(|r| r.template(self.condition.condition_type))
            .map(|t| t.internal_name.clone())
            .unwrap_or_else(|| format!("#{}", self.condition.condition_type));

        write!(f, "{}(", name)?;
        for (i, param) in self.condition.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display = ConditionDisplay {
            condition: self,
            registry: None,
        };
        fmt::Display::fmt(&display, f)
    }
}
