//! Condition string parser
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := and ( '|' and )*
//! and     := primary ( '&' primary )*
//! primary := '(' expr ')' | PROPERTY OPERATOR VALUE
//! ```

use crate::condition::ast::{AstNode, ConditionValue, Operator, Property, SingleCondition};
use crate::error::{LifeRestartError, Result};

/// Parse a condition string into an AST
pub fn parse(condition: &str) -> Result<AstNode> {
    let condition = condition.trim();
    if condition.is_empty() {
        return Err(invalid("Empty condition".to_string()));
    }

    let tokens = tokenize(condition)?;
    let mut parser = Parser { tokens, pos: 0 };
    let ast = parser.parse_or()?;
    if parser.pos != parser.tokens.len() {
        return Err(invalid(format!(
            "Unexpected token {:?} in: {}",
            parser.tokens[parser.pos], condition
        )));
    }
    Ok(ast)
}

fn invalid(msg: String) -> LifeRestartError {
    LifeRestartError::InvalidCondition(msg)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Condition(String),
    And,
    Or,
    OpenParen,
    CloseParen,
}

fn tokenize(condition: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    // Brackets of an array value may contain spaces: "TLT?[1, 2]"
    let mut in_array = false;

    let flush = |current: &mut String, tokens: &mut Vec<Token>| {
        if !current.is_empty() {
            tokens.push(Token::Condition(std::mem::take(current)));
        }
    };

    for c in condition.chars() {
        if in_array {
            if c == ']' {
                in_array = false;
            }
            if !c.is_whitespace() {
                current.push(c);
            }
            continue;
        }
        match c {
            '[' => {
                in_array = true;
                current.push(c);
            }
            c if c.is_whitespace() => flush(&mut current, &mut tokens),
            '(' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::OpenParen);
                depth += 1;
            }
            ')' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::CloseParen);
                depth -= 1;
                if depth < 0 {
                    return Err(invalid("Unbalanced parentheses".to_string()));
                }
            }
            '&' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::And);
            }
            '|' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::Or);
            }
            _ => current.push(c),
        }
    }
    flush(&mut current, &mut tokens);

    if depth != 0 || in_array {
        return Err(invalid(format!("Unbalanced brackets in: {}", condition)));
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn parse_or(&mut self) -> Result<AstNode> {
        let mut left = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let right = self.parse_and()?;
            left = AstNode::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<AstNode> {
        let mut left = self.parse_primary()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let right = self.parse_primary()?;
            left = AstNode::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<AstNode> {
        match self.tokens.get(self.pos).cloned() {
            Some(Token::OpenParen) => {
                self.pos += 1;
                let inner = self.parse_or()?;
                if self.peek() != Some(&Token::CloseParen) {
                    return Err(invalid("Expected ')'".to_string()));
                }
                self.pos += 1;
                Ok(inner)
            }
            Some(Token::Condition(text)) => {
                self.pos += 1;
                parse_single_condition(&text)
            }
            Some(other) => Err(invalid(format!("Unexpected token {:?}", other))),
            None => Err(invalid("Unexpected end of condition".to_string())),
        }
    }
}

fn parse_single_condition(condition: &str) -> Result<AstNode> {
    let pos = condition
        .find(|c| matches!(c, '>' | '<' | '=' | '!' | '?'))
        .ok_or_else(|| invalid(format!("No operator found in: {}", condition)))?;

    let rest = &condition[pos..];
    let (operator, op_len) = if rest.starts_with(">=") {
        (Operator::GreaterEqual, 2)
    } else if rest.starts_with("<=") {
        (Operator::LessEqual, 2)
    } else if rest.starts_with("!=") {
        (Operator::NotEqual, 2)
    } else {
        let op = match rest.as_bytes()[0] {
            b'>' => Operator::Greater,
            b'<' => Operator::Less,
            b'=' => Operator::Equal,
            b'?' => Operator::IncludesAny,
            _ => Operator::ExcludesAll,
        };
        (op, 1)
    };

    let code = condition[..pos].trim();
    let property = Property::from_code(code)
        .ok_or_else(|| invalid(format!("Unknown property '{}' in: {}", code, condition)))?;
    let value = parse_value(&condition[pos + op_len..])?;

    check_operands(property, operator, &value)
        .map_err(|msg| invalid(format!("{} in: {}", msg, condition)))?;

    Ok(AstNode::Single(SingleCondition {
        property,
        operator,
        value,
    }))
}

/// Reject combinations the evaluator could only ever answer with `false`
fn check_operands(
    property: Property,
    operator: Operator,
    value: &ConditionValue,
) -> std::result::Result<(), &'static str> {
    match (property.is_list(), operator, value) {
        (_, op, ConditionValue::Array(_)) if op.is_membership() => Ok(()),
        (_, _, ConditionValue::Array(_)) => Err("Array value needs '?' or '!'"),
        (_, op, ConditionValue::Integer(_)) if op.is_membership() => {
            Err("'?' and '!' need an array value")
        }
        (true, Operator::Equal | Operator::NotEqual, _) => Ok(()),
        (true, _, _) => Err("Lists only support '=', '!=', '?' and '!'"),
        (false, _, _) => Ok(()),
    }
}

fn parse_value(value_str: &str) -> Result<ConditionValue> {
    let value_str = value_str.trim();

    if let Some(inner) = value_str
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        if inner.trim().is_empty() {
            return Ok(ConditionValue::Array(Vec::new()));
        }
        return inner
            .split(',')
            .map(|s| s.trim().parse::<i32>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(ConditionValue::Array)
            .map_err(|_| invalid(format!("Invalid array: {}", value_str)));
    }

    value_str
        .parse::<i32>()
        .map(ConditionValue::Integer)
        .map_err(|_| invalid(format!("Invalid value: {}", value_str)))
}
