//! Condition model: one rendered predicate term of a WHERE clause.
//!
//! Conditions are produced by [`crate::extract`] and consumed by
//! [`crate::assemble`]. Each one records which keyword joins it to its
//! predecessor and a statement-wide sort position, so conditions stored in
//! separate WHERE/AND/OR groups can be put back in declaration order.

use crate::error::{PatchError, PatchResult};
use crate::expr::CompareOp;
use crate::value::Value;
use std::cmp::Ordering;

/// Operator of a rendered condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    IsNull,
    IsNotNull,
}

impl Op {
    pub fn as_sql(self) -> &'static str {
        match self {
            Op::Equal => "=",
            Op::NotEqual => "!=",
            Op::GreaterThan => ">",
            Op::GreaterThanOrEqual => ">=",
            Op::LessThan => "<",
            Op::LessThanOrEqual => "<=",
            Op::IsNull => "IS NULL",
            Op::IsNotNull => "IS NOT NULL",
        }
    }

    /// Whether the operator takes a bound value on its right-hand side.
    pub fn binds_value(self) -> bool {
        !matches!(self, Op::IsNull | Op::IsNotNull)
    }
}

impl From<CompareOp> for Op {
    fn from(op: CompareOp) -> Self {
        match op {
            CompareOp::Equal => Op::Equal,
            CompareOp::NotEqual => Op::NotEqual,
            CompareOp::GreaterThan => Op::GreaterThan,
            CompareOp::GreaterThanOrEqual => Op::GreaterThanOrEqual,
            CompareOp::LessThan => Op::LessThan,
            CompareOp::LessThanOrEqual => Op::LessThanOrEqual,
        }
    }
}

/// Logical keyword associating a condition with its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joiner {
    Where,
    And,
    Or,
}

impl Joiner {
    pub fn keyword(self) -> &'static str {
        match self {
            Joiner::Where => "WHERE",
            Joiner::And => "AND",
            Joiner::Or => "OR",
        }
    }
}

/// One predicate term.
#[derive(Debug, Clone)]
pub struct Condition {
    property: String,
    column: String,
    op: Op,
    param: Option<String>,
    joiner: Joiner,
    sort_order: u32,
}

impl Condition {
    /// Create a condition.
    ///
    /// `param` must be `Some` exactly when `op` binds a value.
    pub fn new(
        property: impl Into<String>,
        op: Op,
        param: Option<String>,
        joiner: Joiner,
        sort_order: u32,
    ) -> PatchResult<Self> {
        let property = property.into();
        if property.trim().is_empty() {
            return Err(PatchError::validation("Condition column cannot be empty"));
        }
        if op.binds_value() != param.is_some() {
            return Err(PatchError::validation(format!(
                "Operator {} on '{property}' {} a parameter",
                op.as_sql(),
                if op.binds_value() { "requires" } else { "does not take" }
            )));
        }
        Ok(Self {
            column: property.clone(),
            property,
            op,
            param,
            joiner,
            sort_order,
        })
    }

    /// Logical property name the condition was declared on.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Column name used when rendering (physical once mapped).
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn param_name(&self) -> Option<&str> {
        self.param.as_deref()
    }

    pub fn joiner(&self) -> Joiner {
        self.joiner
    }

    pub fn sort_order(&self) -> u32 {
        self.sort_order
    }

    pub(crate) fn set_column(&mut self, column: String) {
        self.column = column;
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.sort_order == other.sort_order
    }
}

impl Eq for Condition {}

impl PartialOrd for Condition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Condition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_order.cmp(&other.sort_order)
    }
}

/// A named value bound out-of-band.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    pub name: String,
    pub value: Value,
}

/// Parameters of one statement, unique by name, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ParamList {
    params: Vec<BoundParam>,
}

impl ParamList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.iter().any(|p| p.name == name)
    }

    /// Append a parameter, rejecting a name that is already taken.
    pub fn push(&mut self, name: impl Into<String>, value: Value) -> PatchResult<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(PatchError::ParameterCollision(name));
        }
        self.params.push(BoundParam { name, value });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&BoundParam> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundParam> {
        self.params.iter()
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.params.truncate(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_column() {
        let err = Condition::new(" ", Op::Equal, Some("p".into()), Joiner::Where, 0).unwrap_err();
        assert!(matches!(err, PatchError::Validation(_)));
    }

    #[test]
    fn null_checks_take_no_parameter() {
        assert!(Condition::new("Name", Op::IsNull, None, Joiner::And, 1).is_ok());
        assert!(Condition::new("Name", Op::IsNull, Some("p".into()), Joiner::And, 1).is_err());
        assert!(Condition::new("Name", Op::Equal, None, Joiner::And, 1).is_err());
    }

    #[test]
    fn orders_by_sort_position() {
        let mut conds = vec![
            Condition::new("c", Op::LessThan, Some("c_cond2".into()), Joiner::And, 2).unwrap(),
            Condition::new("a", Op::Equal, Some("a_cond0".into()), Joiner::Where, 0).unwrap(),
            Condition::new("b", Op::IsNull, None, Joiner::Or, 1).unwrap(),
        ];
        conds.sort();
        let props: Vec<_> = conds.iter().map(Condition::property).collect();
        assert_eq!(props, ["a", "b", "c"]);
    }

    #[test]
    fn param_list_rejects_duplicates() {
        let mut params = ParamList::new();
        params.push("Age_cond0", Value::I32(1)).unwrap();
        let err = params.push("Age_cond0", Value::I32(2)).unwrap_err();
        assert!(matches!(err, PatchError::ParameterCollision(name) if name == "Age_cond0"));
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("Age_cond0").unwrap().value, Value::I32(1));
    }
}
