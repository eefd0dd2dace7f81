//! Abstract Syntax Tree for condition expressions

use crate::property::Attribute;

/// AST node for condition expressions
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Single condition like "CHR>5"
    Single(SingleCondition),
    /// AND operation
    And(Box<AstNode>, Box<AstNode>),
    /// OR operation
    Or(Box<AstNode>, Box<AstNode>),
}

/// Single condition expression
#[derive(Debug, Clone, PartialEq)]
pub struct SingleCondition {
    pub property: Property,
    pub operator: Operator,
    pub value: ConditionValue,
}

/// What a condition can look at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    /// Current age (AGE)
    Age,
    /// One of the five attributes
    Attribute(Attribute),
    /// Talents held this life (TLT)
    Talents,
    /// Events fired so far this life (EVT)
    Events,
}

impl Property {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "AGE" => Some(Property::Age),
            "TLT" => Some(Property::Talents),
            "EVT" => Some(Property::Events),
            other => Attribute::from_code(other).map(Property::Attribute),
        }
    }

    /// TLT and EVT are id lists, everything else is a scalar
    pub fn is_list(self) -> bool {
        matches!(self, Property::Talents | Property::Events)
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Greater than (>)
    Greater,
    /// Less than (<)
    Less,
    /// Greater than or equal (>=)
    GreaterEqual,
    /// Less than or equal (<=)
    LessEqual,
    /// Equal (=); "contains" on lists
    Equal,
    /// Not equal (!=); "does not contain" on lists
    NotEqual,
    /// Includes any (?)
    IncludesAny,
    /// Excludes all (!)
    ExcludesAll,
}

impl Operator {
    pub fn is_membership(self) -> bool {
        matches!(self, Operator::IncludesAny | Operator::ExcludesAll)
    }
}

/// Condition value types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionValue {
    Integer(i32),
    Array(Vec<i32>),
}
