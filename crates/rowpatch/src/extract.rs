//! Predicate extraction: [`Expr`] trees to [`Condition`]s.
//!
//! Accepted shapes, per declaration:
//!
//! - `Member op Constant`
//! - `Constant op Member` (operator mirrored)
//! - `Member == Null` / `Member != Null` (rendered `IS NULL` / `IS NOT NULL`)
//! - a chain of the above joined by one logical operator matching the joiner:
//!   AND for WHERE/AND declarations, OR for OR declarations
//!
//! Anything else is rejected with [`PatchError::UnsupportedPredicateShape`]
//! and leaves the [`Predicates`] untouched.

use crate::condition::{Condition, Joiner, Op, ParamList};
use crate::error::{PatchError, PatchResult};
use crate::expr::{CompareOp, Expr};
use crate::ident::Ident;
use crate::value::Value;

/// Declared conditions of one statement, grouped by joiner.
///
/// The sort counter and the parameter discriminator live here, so they are
/// scoped to one statement and start from zero for every new request.
#[derive(Debug, Clone, Default)]
pub struct Predicates {
    where_group: Vec<Condition>,
    and_group: Vec<Condition>,
    or_group: Vec<Condition>,
    params: ParamList,
    next_sort: u32,
    next_discriminator: u32,
}

struct Leaf {
    property: String,
    op: Op,
    value: Option<Value>,
}

impl Predicates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract `expr` and append the resulting conditions to `joiner`'s group.
    ///
    /// Returns the number of conditions added.
    pub fn add(&mut self, expr: Expr, joiner: Joiner) -> PatchResult<usize> {
        let (terms, continuation) = split_terms(expr, joiner)?;
        let leaves = terms
            .into_iter()
            .map(extract_leaf)
            .collect::<PatchResult<Vec<_>>>()?;

        let mut staged = Vec::with_capacity(leaves.len());
        let mut sort = self.next_sort;
        let mut discriminator = self.next_discriminator;
        for (i, leaf) in leaves.into_iter().enumerate() {
            let joiner = if i == 0 { joiner } else { continuation };
            let bound = match leaf.value {
                Some(value) => {
                    let name = param_name(&leaf.property, discriminator);
                    discriminator += 1;
                    if self.params.contains(&name) {
                        return Err(PatchError::ParameterCollision(name));
                    }
                    Some((name, value))
                }
                None => None,
            };
            let condition = Condition::new(
                leaf.property,
                leaf.op,
                bound.as_ref().map(|(name, _)| name.clone()),
                joiner,
                sort,
            )?;
            sort += 1;
            staged.push((condition, bound));
        }

        let added = staged.len();
        let params_before = self.params.len();
        for (_, bound) in &staged {
            if let Some((name, value)) = bound {
                if let Err(err) = self.params.push(name.clone(), value.clone()) {
                    self.params.truncate(params_before);
                    return Err(err);
                }
            }
        }
        for (condition, _) in staged {
            self.group_mut(condition.joiner()).push(condition);
        }
        self.next_sort = sort;
        self.next_discriminator = discriminator;
        Ok(added)
    }

    /// Conditions declared with the given joiner, in declaration order.
    pub fn group(&self, joiner: Joiner) -> &[Condition] {
        match joiner {
            Joiner::Where => &self.where_group,
            Joiner::And => &self.and_group,
            Joiner::Or => &self.or_group,
        }
    }

    pub(crate) fn group_mut(&mut self, joiner: Joiner) -> &mut Vec<Condition> {
        match joiner {
            Joiner::Where => &mut self.where_group,
            Joiner::And => &mut self.and_group,
            Joiner::Or => &mut self.or_group,
        }
    }

    /// All conditions, WHERE + AND + OR concatenated and ordered by sort position.
    pub fn ordered(&self) -> Vec<&Condition> {
        let mut all: Vec<&Condition> = self
            .where_group
            .iter()
            .chain(&self.and_group)
            .chain(&self.or_group)
            .collect();
        all.sort_by_key(|c| c.sort_order());
        all
    }

    pub fn params(&self) -> &ParamList {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.where_group.is_empty() && self.and_group.is_empty() && self.or_group.is_empty()
    }

    pub fn len(&self) -> usize {
        self.where_group.len() + self.and_group.len() + self.or_group.len()
    }
}

/// Flatten a same-operator chain into its terms.
///
/// Returns the terms and the joiner that links the second and later terms.
fn split_terms(expr: Expr, joiner: Joiner) -> PatchResult<(Vec<Expr>, Joiner)> {
    match (expr, joiner) {
        (Expr::And(a, b), Joiner::Where | Joiner::And) => {
            let mut terms = Vec::new();
            flatten(*a, &mut terms, true)?;
            flatten(*b, &mut terms, true)?;
            Ok((terms, Joiner::And))
        }
        (Expr::Or(a, b), Joiner::Or) => {
            let mut terms = Vec::new();
            flatten(*a, &mut terms, false)?;
            flatten(*b, &mut terms, false)?;
            Ok((terms, Joiner::Or))
        }
        (expr @ Expr::And(..), Joiner::Or) => Err(PatchError::unsupported(format!(
            "AND expression declared as an OR condition: {expr}"
        ))),
        (expr @ Expr::Or(..), _) => Err(PatchError::unsupported(format!(
            "OR expression declared as a {} condition: {expr}",
            joiner.keyword()
        ))),
        (expr, joiner) => Ok((vec![expr], joiner)),
    }
}

fn flatten(expr: Expr, out: &mut Vec<Expr>, conjunction: bool) -> PatchResult<()> {
    match expr {
        Expr::And(a, b) if conjunction => {
            flatten(*a, out, conjunction)?;
            flatten(*b, out, conjunction)
        }
        Expr::Or(a, b) if !conjunction => {
            flatten(*a, out, conjunction)?;
            flatten(*b, out, conjunction)
        }
        expr @ (Expr::And(..) | Expr::Or(..)) => Err(PatchError::unsupported(format!(
            "mixed AND/OR expression: {expr}"
        ))),
        leaf => {
            out.push(leaf);
            Ok(())
        }
    }
}

fn extract_leaf(expr: Expr) -> PatchResult<Leaf> {
    let (lhs, op, rhs) = match expr {
        Expr::Compare { lhs, op, rhs } => (lhs, op, rhs),
        other => {
            return Err(PatchError::unsupported(format!(
                "expected a property comparison, got {other}"
            )));
        }
    };

    match (*lhs, *rhs) {
        (Expr::Member(property), Expr::Constant(value)) => leaf(property, op, value),
        (Expr::Constant(value), Expr::Member(property)) => leaf(property, op.mirrored(), value),
        (Expr::Member(a), Expr::Member(b)) => Err(PatchError::unsupported(format!(
            "comparison between two properties: {a} {} {b}",
            op.symbol()
        ))),
        (lhs, rhs) => Err(PatchError::unsupported(format!(
            "comparison must be property vs value, got {lhs} {} {rhs}",
            op.symbol()
        ))),
    }
}

fn leaf(property: String, op: CompareOp, value: Value) -> PatchResult<Leaf> {
    // Rendered later as an identifier; reject anything that is not one now.
    Ident::parse(&property)?;
    if value.is_null() {
        let op = match op {
            CompareOp::Equal => Op::IsNull,
            CompareOp::NotEqual => Op::IsNotNull,
            other => {
                return Err(PatchError::unsupported(format!(
                    "{property} {} NULL cannot be expressed",
                    other.symbol()
                )));
            }
        };
        return Ok(Leaf {
            property,
            op,
            value: None,
        });
    }
    Ok(Leaf {
        property,
        op: op.into(),
        value: Some(value),
    })
}

/// `<base>_cond<n>`.
fn param_name(property: &str, discriminator: u32) -> String {
    format!("{}_cond{discriminator}", param_base(property))
}

/// A property name reduced to identifier characters, usable after `@`.
pub(crate) fn param_base(property: &str) -> String {
    let bare = Ident::parse(property).map_or_else(|_| property.to_string(), |i| i.name().to_string());
    let mut base: String = bare
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if base.starts_with(|c: char| c.is_ascii_digit()) {
        base.insert(0, '_');
    }
    base
}
