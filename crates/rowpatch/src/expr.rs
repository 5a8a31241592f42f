//! Typed predicate expressions.
//!
//! A predicate is a small tree of tagged nodes. Callers usually build it with
//! [`col`] and the comparison helpers:
//!
//! ```ignore
//! use rowpatch::col;
//!
//! let adults = col("Age").gt(18);
//! let tom = col("Name").eq("Tom");
//! let both = adults.and(tom);
//! ```
//!
//! Only a narrow subset of trees can be turned into WHERE conditions; see
//! [`crate::extract`] for the accepted shapes.

use crate::value::Value;
use std::fmt;

/// Comparison operator between two expression nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl CompareOp {
    /// The operator with its operands swapped: `5 < x` is `x > 5`.
    pub fn mirrored(self) -> Self {
        match self {
            CompareOp::Equal => CompareOp::Equal,
            CompareOp::NotEqual => CompareOp::NotEqual,
            CompareOp::GreaterThan => CompareOp::LessThan,
            CompareOp::GreaterThanOrEqual => CompareOp::LessThanOrEqual,
            CompareOp::LessThan => CompareOp::GreaterThan,
            CompareOp::LessThanOrEqual => CompareOp::GreaterThanOrEqual,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Equal => "=",
            CompareOp::NotEqual => "!=",
            CompareOp::GreaterThan => ">",
            CompareOp::GreaterThanOrEqual => ">=",
            CompareOp::LessThan => "<",
            CompareOp::LessThanOrEqual => "<=",
        }
    }
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Reference to an entity property (logical column name).
    Member(String),
    /// A literal or captured value.
    Constant(Value),
    /// `lhs op rhs`
    Compare {
        lhs: Box<Expr>,
        op: CompareOp,
        rhs: Box<Expr>,
    },
    /// `lhs AND rhs`
    And(Box<Expr>, Box<Expr>),
    /// `lhs OR rhs`
    Or(Box<Expr>, Box<Expr>),
    /// `NOT inner`
    Not(Box<Expr>),
}

impl Expr {
    pub fn member(name: impl Into<String>) -> Self {
        Expr::Member(name.into())
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Expr::Constant(value.into())
    }

    pub fn compare(lhs: Expr, op: CompareOp, rhs: Expr) -> Self {
        Expr::Compare {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    /// Combine with another expression using AND.
    pub fn and(self, other: Expr) -> Self {
        Expr::And(Box::new(self), Box::new(other))
    }

    /// Combine with another expression using OR.
    pub fn or(self, other: Expr) -> Self {
        Expr::Or(Box::new(self), Box::new(other))
    }

    /// Negate this expression.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Member(name) => f.write_str(name),
            Expr::Constant(_) => f.write_str("<value>"),
            Expr::Compare { lhs, op, rhs } => write!(f, "{lhs} {} {rhs}", op.symbol()),
            Expr::And(a, b) => write!(f, "({a} AND {b})"),
            Expr::Or(a, b) => write!(f, "({a} OR {b})"),
            Expr::Not(inner) => write!(f, "NOT ({inner})"),
        }
    }
}

/// A property reference used to start a comparison.
#[derive(Debug, Clone)]
pub struct Column(String);

/// Reference an entity property by its logical name.
pub fn col(name: impl Into<String>) -> Column {
    Column(name.into())
}

impl Column {
    fn cmp(self, op: CompareOp, value: impl Into<Value>) -> Expr {
        Expr::compare(Expr::Member(self.0), op, Expr::Constant(value.into()))
    }

    /// `column = value`
    pub fn eq(self, value: impl Into<Value>) -> Expr {
        self.cmp(CompareOp::Equal, value)
    }

    /// `column != value`
    pub fn ne(self, value: impl Into<Value>) -> Expr {
        self.cmp(CompareOp::NotEqual, value)
    }

    /// `column > value`
    pub fn gt(self, value: impl Into<Value>) -> Expr {
        self.cmp(CompareOp::GreaterThan, value)
    }

    /// `column >= value`
    pub fn gte(self, value: impl Into<Value>) -> Expr {
        self.cmp(CompareOp::GreaterThanOrEqual, value)
    }

    /// `column < value`
    pub fn lt(self, value: impl Into<Value>) -> Expr {
        self.cmp(CompareOp::LessThan, value)
    }

    /// `column <= value`
    pub fn lte(self, value: impl Into<Value>) -> Expr {
        self.cmp(CompareOp::LessThanOrEqual, value)
    }

    /// `column IS NULL`
    pub fn is_null(self) -> Expr {
        self.cmp(CompareOp::Equal, Value::Null)
    }

    /// `column IS NOT NULL`
    pub fn is_not_null(self) -> Expr {
        self.cmp(CompareOp::NotEqual, Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_build_compare_nodes() {
        let expr = col("Age").gt(18);
        assert_eq!(
            expr,
            Expr::compare(
                Expr::member("Age"),
                CompareOp::GreaterThan,
                Expr::constant(18)
            )
        );
    }

    #[test]
    fn mirrored_is_an_involution() {
        for op in [
            CompareOp::Equal,
            CompareOp::NotEqual,
            CompareOp::GreaterThan,
            CompareOp::GreaterThanOrEqual,
            CompareOp::LessThan,
            CompareOp::LessThanOrEqual,
        ] {
            assert_eq!(op.mirrored().mirrored(), op);
        }
        assert_eq!(CompareOp::LessThan.mirrored(), CompareOp::GreaterThan);
    }

    #[test]
    fn display_hides_values() {
        let expr = col("Name").eq("secret").and(col("Age").lt(5));
        assert_eq!(expr.to_string(), "(Name = <value> AND Age < <value>)");
    }
}
