//! Condition evaluator

use crate::condition::ast::{AstNode, ConditionValue, Operator, Property, SingleCondition};
use crate::property::PropertyState;

/// Evaluate an AST against a PropertyState
pub fn check(ast: &AstNode, state: &PropertyState) -> bool {
    match ast {
        AstNode::Single(cond) => check_single(cond, state),
        AstNode::And(left, right) => check(left, state) && check(right, state),
        AstNode::Or(left, right) => check(left, state) || check(right, state),
    }
}

/// Property value as seen by a condition. Lists are borrowed from the state.
#[derive(Debug, Clone, Copy)]
pub enum PropertyValue<'a> {
    Integer(i32),
    List(&'a [i32]),
}

impl PropertyState {
    /// Get property value for condition evaluation
    pub fn get(&self, property: Property) -> PropertyValue<'_> {
        match property {
            Property::Age => PropertyValue::Integer(self.age),
            Property::Attribute(attribute) => PropertyValue::Integer(self.attributes.get(attribute)),
            Property::Talents => PropertyValue::List(&self.tlt),
            Property::Events => PropertyValue::List(&self.evt),
        }
    }
}

fn check_single(cond: &SingleCondition, state: &PropertyState) -> bool {
    match (state.get(cond.property), &cond.value) {
        (PropertyValue::Integer(pv), ConditionValue::Integer(cv)) => match cond.operator {
            Operator::Greater => pv > *cv,
            Operator::Less => pv < *cv,
            Operator::GreaterEqual => pv >= *cv,
            Operator::LessEqual => pv <= *cv,
            Operator::Equal => pv == *cv,
            Operator::NotEqual => pv != *cv,
            Operator::IncludesAny | Operator::ExcludesAll => false,
        },
        (PropertyValue::Integer(pv), ConditionValue::Array(arr)) => match cond.operator {
            Operator::IncludesAny => arr.contains(&pv),
            Operator::ExcludesAll => !arr.contains(&pv),
            _ => false,
        },
        // TLT=1001 means "list contains 1001"
        (PropertyValue::List(list), ConditionValue::Integer(cv)) => match cond.operator {
            Operator::Equal => list.contains(cv),
            Operator::NotEqual => !list.contains(cv),
            _ => false,
        },
        (PropertyValue::List(list), ConditionValue::Array(arr)) => match cond.operator {
            Operator::IncludesAny => list.iter().any(|v| arr.contains(v)),
            Operator::ExcludesAll => list.iter().all(|v| !arr.contains(v)),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::parser::parse;
    use crate::property::AttributeSet;

    fn state_with(chr: i32, int: i32) -> PropertyState {
        PropertyState::new(AttributeSet::new(chr, int, 0, 0, 5), &[])
    }

    #[test]
    fn test_simple_comparison() {
        let state = state_with(10, 0);

        assert!(check(&parse("CHR>5").unwrap(), &state));
        assert!(!check(&parse("CHR<5").unwrap(), &state));
        assert!(check(&parse("CHR=10").unwrap(), &state));
        assert!(check(&parse("SPR!=4").unwrap(), &state));
    }

    #[test]
    fn test_and_or_condition() {
        let state = state_with(10, 5);

        assert!(check(&parse("CHR>5 & INT>=5").unwrap(), &state));
        assert!(!check(&parse("CHR>5 & INT>5").unwrap(), &state));
        assert!(check(&parse("CHR>50 | INT>4").unwrap(), &state));
        assert!(!check(&parse("CHR>50 | INT>15").unwrap(), &state));
    }

    #[test]
    fn test_age() {
        let mut state = state_with(0, 0);
        state.age = 20;

        assert!(check(&parse("AGE>=18").unwrap(), &state));
        assert!(check(&parse("AGE?[19,20,21]").unwrap(), &state));
        assert!(!check(&parse("AGE![20]").unwrap(), &state));
    }

    #[test]
    fn test_list_includes_excludes() {
        let mut state = PropertyState::new(AttributeSet::default(), &[1, 2, 3]);
        state.record_event(10001);

        assert!(check(&parse("TLT?[1,4,5]").unwrap(), &state));
        assert!(!check(&parse("TLT?[4,5,6]").unwrap(), &state));
        assert!(!check(&parse("EVT![10001,4]").unwrap(), &state));
        assert!(check(&parse("EVT![4,5,6]").unwrap(), &state));
        assert!(check(&parse("EVT![]").unwrap(), &state));
        assert!(!check(&parse("EVT?[]").unwrap(), &state));
    }

    #[test]
    fn test_list_equality() {
        let state = PropertyState::new(AttributeSet::default(), &[1001, 1002]);

        assert!(check(&parse("TLT=1001").unwrap(), &state));
        assert!(!check(&parse("TLT=9999").unwrap(), &state));
        assert!(!check(&parse("TLT!=1001").unwrap(), &state));
        assert!(check(&parse("TLT!=9999").unwrap(), &state));
    }

    #[test]
    fn test_complex_condition() {
        let mut state = PropertyState::new(AttributeSet::new(10, 0, 200, 0, 5), &[1001]);
        state.age = 20;

        let ast = parse("AGE>=18 & CHR>5 & (TLT?[1001] | STR<100)").unwrap();
        assert!(check(&ast, &state));

        let ast = parse("AGE>=18 & (TLT?[1002] | STR<100)").unwrap();
        assert!(!check(&ast, &state));
    }
}
