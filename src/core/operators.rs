//! Semantics for the binary and unary operators the machine's `BinaryOp`
//! and `UnaryOp` control symbols dispatch to.

use crate::construct::symbol::{BinOp, UnOp, Value};
use crate::vm::trace::Trace;

fn type_error(op: impl std::fmt::Display, a: &Value, b: &Value) -> Trace {
    Trace::operator_type_error(format!(
        "can't apply '{}' to a {} and a {}",
        op, a.type_name(), b.type_name(),
    ))
}

/// Flattens a value into the list-of-values `aug` treats it as: `nil`
/// becomes the empty list, a tuple becomes its elements, anything else is
/// a singleton list.
fn as_list(value: Value) -> Vec<Value> {
    match value {
        Value::Nil => vec![],
        Value::Tuple(items) => items,
        other => vec![other],
    }
}

/// Applies a binary operator to its two operands. `a` is the left operand
/// (the first one popped off the stack), `b` is the right.
pub fn binop(op: BinOp, a: Value, b: Value) -> Result<Value, Trace> {
    use BinOp::*;
    match op {
        Add | Sub | Mul | Div | Pow => {
            let (x, y) = match (&a, &b) {
                (Value::Int(x), Value::Int(y)) => (*x, *y),
                _ => return Err(type_error(op, &a, &b)),
            };
            let result = match op {
                Add => x.checked_add(y),
                Sub => x.checked_sub(y),
                Mul => x.checked_mul(y),
                Div => {
                    if y == 0 { return Err(Trace::division_by_zero()); }
                    x.checked_div(y)
                },
                Pow => {
                    if y < 0 {
                        return Err(Trace::operator_type_error("can't raise an integer to a negative power"));
                    }
                    x.checked_pow(y as u32)
                },
                _ => unreachable!(),
            };
            result.map(Value::Int).ok_or_else(|| Trace::operator_type_error("integer overflow"))
        },
        Or | And => {
            let (x, y) = match (&a, &b) {
                (Value::Bool(x), Value::Bool(y)) => (*x, *y),
                _ => return Err(type_error(op, &a, &b)),
            };
            Ok(Value::Bool(if op == Or { x || y } else { x && y }))
        },
        Gr | Ge | Ls | Le => {
            let (x, y) = match (&a, &b) {
                (Value::Int(x), Value::Int(y)) => (*x, *y),
                _ => return Err(type_error(op, &a, &b)),
            };
            let result = match op {
                Gr => x > y,
                Ge => x >= y,
                Ls => x < y,
                Le => x <= y,
                _ => unreachable!(),
            };
            Ok(Value::Bool(result))
        },
        Eq => Ok(Value::Bool(a == b)),
        Ne => Ok(Value::Bool(a != b)),
        Aug => {
            let mut list = as_list(a);
            list.extend(as_list(b));
            Ok(Value::Tuple(list))
        },
    }
}

/// Applies a unary operator to its operand.
pub fn unop(op: UnOp, a: Value) -> Result<Value, Trace> {
    match (op, a) {
        (UnOp::Neg, Value::Int(n)) => n.checked_neg()
            .map(Value::Int)
            .ok_or_else(|| Trace::operator_type_error("integer overflow")),
        (UnOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (op, a) => Err(Trace::operator_type_error(format!(
            "can't apply '{}' to a {}", op, a.type_name(),
        ))),
    }
}
