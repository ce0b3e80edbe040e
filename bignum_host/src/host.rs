//! Host value model and the default bignum class
//!
//! A scripting host hands the facade dynamically typed [`Value`]s. Bignum
//! methods are looked up by name in the environment's method table at call
//! time, so an interposed implementation takes effect on the next call.

use std::fmt;
use std::rc::Rc;

use crate::dispatch::{BinOp, CmpOp};
use crate::env::Environment;
use crate::error::{BignumError, BignumResult};
use crate::interpose::MethodTable;
use crate::operand::Operand;
use crate::value::BigNum;

/// Class name of the bignum method table
pub const BIGNUM_CLASS: &str = "bignum";

/// Dynamically typed host value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Str(String),
    BigNum(BigNum),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::BigNum(_) => BIGNUM_CLASS,
        }
    }

    /// View this value as arithmetic argument `position`.
    pub fn as_operand(&self, position: usize) -> BignumResult<Operand<'_>> {
        match self {
            Value::BigNum(n) => Ok(Operand::Handle(n)),
            Value::Str(s) => Ok(Operand::DecimalText(s.as_str())),
            Value::Number(f) => Ok(Operand::FloatLiteral(*f)),
            other => Err(BignumError::invalid_operand(
                position,
                format!("bignum expected, got {}", other.type_name()),
            )),
        }
    }

    pub fn as_bignum(&self) -> Option<&BigNum> {
        match self {
            Value::BigNum(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<BigNum> for Value {
    fn from(value: BigNum) -> Self {
        Value::BigNum(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::BigNum(n) => write!(f, "{}", n),
        }
    }
}

/// A bignum method as stored in the class table
pub type Method = Rc<dyn Fn(&mut Environment, &[Value]) -> BignumResult<Value>>;

/// Wrap a closure as a [`Method`]
pub fn method<F>(f: F) -> Method
where
    F: Fn(&mut Environment, &[Value]) -> BignumResult<Value> + 'static,
{
    Rc::new(f)
}

static NIL: Value = Value::Nil;

/// Argument `index` (0-based), or nil when absent
pub fn arg(args: &[Value], index: usize) -> &Value {
    args.get(index).unwrap_or(&NIL)
}

fn binary(op: BinOp) -> Method {
    method(move |env, args| {
        let a = arg(args, 0).as_operand(1)?;
        let b = arg(args, 1).as_operand(2)?;
        env.arith(op, a, b).map(Value::BigNum)
    })
}

fn comparison(op: CmpOp) -> Method {
    method(move |env, args| {
        let a = arg(args, 0).as_operand(1)?;
        let b = arg(args, 1).as_operand(2)?;
        env.compare_op(op, a, b).map(Value::Bool)
    })
}

fn tostring(_env: &mut Environment, args: &[Value]) -> BignumResult<Value> {
    match arg(args, 0) {
        Value::BigNum(n) => n.to_dec().map(Value::Str),
        other => Err(BignumError::invalid_operand(
            1,
            format!("bignum expected, got {}", other.type_name()),
        )),
    }
}

/// The bignum class with its default metamethods
pub fn bignum_class() -> MethodTable<Method> {
    let mut table = MethodTable::new(BIGNUM_CLASS);
    for op in [
        BinOp::Add,
        BinOp::Sub,
        BinOp::Mul,
        BinOp::Div,
        BinOp::Mod,
        BinOp::Pow,
    ] {
        table.set(op.metamethod(), binary(op));
    }
    for op in [CmpOp::Eq, CmpOp::Lt, CmpOp::Le] {
        table.set(op.metamethod(), comparison(op));
    }
    table.set("__tostring", method(tostring));
    table
}
