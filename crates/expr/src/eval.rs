//! The shared tree-walking evaluator behind both variants.
//!
//! The parser guarantees each variant only ever feeds this walker the
//! node kinds its grammar admits; the walker itself only varies in how
//! it coerces values in boolean positions (`strict_bool`).
use crate::ast::{BinaryOp, Expr, ParamRef, PathSegment, UnaryOp};
use crate::error::ExpressionError;
use crate::functions::FunctionRegistry;
use crate::value::{as_f64, coerce_string, compare, loose_eq, truthy, type_name};
use quill_types::ParameterMap;
use serde_json::{Number, Value};
use std::cmp::Ordering;

pub(crate) struct Interp<'a> {
    /// Source text of the expression, for error context.
    pub expression: &'a str,
    pub parameters: &'a ParameterMap,
    pub functions: Option<&'a FunctionRegistry>,
    /// When set, a value in boolean position must already be a boolean;
    /// otherwise truthiness coercion applies.
    pub strict_bool: bool,
}

impl Interp<'_> {
    /// Evaluates the expression tree and coerces the result into the
    /// condition outcome.
    pub fn eval_condition(&self, expr: &Expr) -> Result<bool, ExpressionError> {
        let value = self.eval(expr)?;
        self.condition_value(value)
    }

    fn condition_value(&self, value: Value) -> Result<bool, ExpressionError> {
        match value {
            Value::Bool(b) => Ok(b),
            other if !self.strict_bool => Ok(truthy(&other)),
            other => Err(ExpressionError::NotBoolean {
                expression: self.expression.to_string(),
                actual: type_name(&other).to_string(),
            }),
        }
    }

    fn eval(&self, expr: &Expr) -> Result<Value, ExpressionError> {
        match expr {
            Expr::Literal(v) => Ok(v.clone()),
            Expr::Param(param) => Ok(self.resolve_param(param)),
            Expr::Unary { op, operand } => self.eval_unary(*op, operand),
            Expr::Binary { op, lhs, rhs } => self.eval_binary(*op, lhs, rhs),
            Expr::Call { name, args } => self.eval_call(name, args),
        }
    }

    /// An absent parameter, or a navigation path that dead-ends,
    /// resolves to null.
    fn resolve_param(&self, param: &ParamRef) -> Value {
        let mut current = match self.parameters.get(&param.name) {
            Some(v) => v,
            None => return Value::Null,
        };
        for segment in &param.path {
            let next = match segment {
                PathSegment::Key(key) => current.get(key),
                PathSegment::Index(idx) => current.get(idx),
            };
            match next {
                Some(v) => current = v,
                None => return Value::Null,
            }
        }
        current.clone()
    }

    fn eval_unary(&self, op: UnaryOp, operand: &Expr) -> Result<Value, ExpressionError> {
        let value = self.eval(operand)?;
        match op {
            UnaryOp::Not => Ok(Value::Bool(!self.condition_value(value)?)),
            UnaryOp::Neg => {
                let n = as_f64(&value).ok_or_else(|| self.eval_error("cannot negate a non-number"))?;
                self.number(-n)
            }
        }
    }

    fn eval_binary(&self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Result<Value, ExpressionError> {
        match op {
            // Logic short-circuits; each operand is its own boolean position.
            BinaryOp::Or => {
                if self.eval_condition(lhs)? {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.eval_condition(rhs)?))
            }
            BinaryOp::And => {
                if !self.eval_condition(lhs)? {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.eval_condition(rhs)?))
            }
            BinaryOp::Eq => Ok(Value::Bool(loose_eq(&self.eval(lhs)?, &self.eval(rhs)?))),
            BinaryOp::Ne => Ok(Value::Bool(!loose_eq(&self.eval(lhs)?, &self.eval(rhs)?))),
            BinaryOp::Gt | BinaryOp::Ge | BinaryOp::Lt | BinaryOp::Le => {
                let a = self.eval(lhs)?;
                let b = self.eval(rhs)?;
                // Incomparable operands (null among them) order as false.
                let outcome = match compare(&a, &b) {
                    Some(ordering) => match op {
                        BinaryOp::Gt => ordering == Ordering::Greater,
                        BinaryOp::Ge => ordering != Ordering::Less,
                        BinaryOp::Lt => ordering == Ordering::Less,
                        BinaryOp::Le => ordering != Ordering::Greater,
                        _ => unreachable!(),
                    },
                    None => false,
                };
                Ok(Value::Bool(outcome))
            }
            BinaryOp::Add => {
                let a = self.eval(lhs)?;
                let b = self.eval(rhs)?;
                if a.is_string() || b.is_string() {
                    return Ok(Value::String(coerce_string(&a) + &coerce_string(&b)));
                }
                self.arith(op, &a, &b)
            }
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
                let a = self.eval(lhs)?;
                let b = self.eval(rhs)?;
                self.arith(op, &a, &b)
            }
        }
    }

    fn arith(&self, op: BinaryOp, a: &Value, b: &Value) -> Result<Value, ExpressionError> {
        let (x, y) = match (as_f64(a), as_f64(b)) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                return Err(self.eval_error(&format!(
                    "arithmetic needs numbers, got {} and {}",
                    type_name(a),
                    type_name(b)
                )));
            }
        };
        let result = match op {
            BinaryOp::Add => x + y,
            BinaryOp::Sub => x - y,
            BinaryOp::Mul => x * y,
            BinaryOp::Div => x / y,
            BinaryOp::Rem => x % y,
            _ => unreachable!(),
        };
        self.number(result)
    }

    fn eval_call(&self, name: &str, args: &[Expr]) -> Result<Value, ExpressionError> {
        let registry = self
            .functions
            .ok_or_else(|| self.eval_error("function calls are not supported by this evaluator"))?;
        let func = registry.get(name).ok_or_else(|| ExpressionError::Function {
            function: name.to_string(),
            message: "unknown function".to_string(),
        })?;
        let values = args
            .iter()
            .map(|arg| self.eval(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(func(values))
    }

    fn number(&self, value: f64) -> Result<Value, ExpressionError> {
        Number::from_f64(value)
            .map(Value::Number)
            .ok_or_else(|| self.eval_error("arithmetic produced a non-finite number"))
    }

    fn eval_error(&self, message: &str) -> ExpressionError {
        ExpressionError::Eval {
            expression: self.expression.to_string(),
            message: message.to_string(),
        }
    }
}
