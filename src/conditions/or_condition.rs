//! OR-chains of AND-chains
//!
//! an [`OrChain`] is the whole trigger expression in disjunctive normal form:
//! `(c1 AND c2) OR (c3) OR ...`. each clause is an [`OrCondition`] owning its
//! AND-chain.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::condition::{
    duplicate_chain, duplicate_chain_and_qualify, Condition, ConditionParseTarget, CONDITION_LABEL,
};
use super::parameter::Qualifier;
use super::registry::ConditionTypeRegistry;
use crate::chunk::{ChunkError, DataChunkInfo, DataChunkInput, DataChunkOutput};
use crate::script::ScriptParseTarget;

/// chunk label for one clause of the OR-chain
pub const OR_CONDITION_LABEL: &str = "OrCondition";

pub const OR_CONDITION_VERSION: u16 = 1;

/// one disjunct: the AND of its conditions
///
/// an empty AND-chain is an absent chain; how it evaluates is up to the
/// evaluator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrCondition {
    conditions: Vec<Condition>,
}

impl OrCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conditions(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn conditions_mut(&mut self) -> &mut Vec<Condition> {
        &mut self.conditions
    }

    /// append at the tail of the AND-chain
    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// true when the clause has no AND-chain
    pub fn is_vacuous(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn duplicate(&self) -> Self {
        Self {
            conditions: duplicate_chain(&self.conditions),
        }
    }

    pub fn duplicate_and_qualify(&self, q: &Qualifier) -> Self {
        Self {
            conditions: duplicate_chain_and_qualify(&self.conditions, q),
        }
    }

    /// chunk parser for an `OrCondition` inside a `Script`
    ///
    /// the receiving object must be a [`ScriptParseTarget`]. nested `Condition`
    /// chunks fill a detached clause, which is appended to the script's
    /// OR-chain only if every one of them parsed.
    pub fn parse_or_condition_chunk(
        input: &mut DataChunkInput,
        info: &DataChunkInfo,
        target: &mut dyn Any,
    ) -> Result<(), ChunkError> {
        let target = target
            .downcast_mut::<ScriptParseTarget>()
            .ok_or(ChunkError::UnexpectedTarget("ScriptParseTarget"))?;

        input.register_parser(CONDITION_LABEL, &info.label, Condition::parse_condition_chunk);

        let mut nested = ConditionParseTarget {
            or_condition: OrCondition::new(),
            registry: Rc::clone(&target.registry),
        };
        input.parse(&mut nested)?;

        debug!(
            script = %target.script.name,
            conditions = nested.or_condition.conditions.len(),
            "parsed or-condition"
        );
        target.script.push_or_condition(nested.or_condition);
        Ok(())
    }

    pub fn write(&self, out: &mut DataChunkOutput, registry: &dyn ConditionTypeRegistry) {
        out.open_data_chunk(OR_CONDITION_LABEL, OR_CONDITION_VERSION);
        for condition in &self.conditions {
            condition.write(out, registry);
        }
        out.close_data_chunk();
    }

    fn fmt_with(
        &self,
        f: &mut fmt::Formatter<'_>,
        registry: Option<&dyn ConditionTypeRegistry>,
    ) -> fmt::Result {
        if self.conditions.is_empty() {
            return write!(f, "TRUE");
        }

        write!(f, "(")?;
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            match registry {
                Some(registry) => write!(f, "{}", condition.display(registry))?,
                None => write!(f, "{}", condition)?,
            }
        }
        write!(f, ")")
    }
}

impl fmt::Display for OrCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(f, None)
    }
}

/// the full trigger expression: OR of its clauses, in order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrChain {
    clauses: Vec<OrCondition>,
}

impl OrChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// head of the chain
    pub fn first(&self) -> Option<&OrCondition> {
        self.clauses.first()
    }

    pub fn get(&self, index: usize) -> Option<&OrCondition> {
        self.clauses.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OrCondition> {
        self.clauses.iter()
    }

    pub fn clauses_mut(&mut self) -> &mut Vec<OrCondition> {
        &mut self.clauses
    }

    /// append at the tail (or become the head of an empty chain)
    pub fn push(&mut self, clause: OrCondition) {
        self.clauses.push(clause);
    }

    pub fn duplicate(&self) -> Self {
        self.clauses.iter().map(OrCondition::duplicate).collect()
    }

    pub fn duplicate_and_qualify(&self, q: &Qualifier) -> Self {
        self.clauses
            .iter()
            .map(|c| c.duplicate_and_qualify(q))
            .collect()
    }

    /// total number of conditions across all clauses
    pub fn condition_count(&self) -> usize {
        self.clauses.iter().map(|c| c.conditions.len()).sum()
    }

    pub fn display<'a>(&'a self, registry: &'a dyn ConditionTypeRegistry) -> OrChainDisplay<'a> {
        OrChainDisplay {
            chain: self,
            registry: Some(registry),
        }
    }
}

impl FromIterator<OrCondition> for OrChain {
    fn from_iter<I: IntoIterator<Item = OrCondition>>(iter: I) -> Self {
        Self {
            clauses: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<OrCondition>> for OrChain {
    fn from(clauses: Vec<OrCondition>) -> Self {
        Self { clauses }
    }
}

impl<'a> IntoIterator for &'a OrChain {
    type Item = &'a OrCondition;
    type IntoIter = std::slice::Iter<'a, OrCondition>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

pub struct OrChainDisplay<'a> {
    chain: &'a OrChain,
    registry: Option<&'a dyn ConditionTypeRegistry>,
}

impl fmt::Display for OrChainDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // no clause can fire
        if self.chain.is_empty() {
            return write!(f, "FALSE");
        }

        for (i, clause) in self.chain.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " OR ")?;
            }
            clause.fmt_with(f, self.registry)?;
        }
        Ok(())
    }
}

impl fmt::Display for OrChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display = OrChainDisplay {
            chain: self,
            registry: None,
        };
        fmt::Display::fmt(&display, f)
    }
}
