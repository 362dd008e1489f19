//! Semantics for the thirteen named built-in functions RPAL programs can
//! apply without importing anything: `Print`, the `Is*` predicates, the
//! string primitives `Stem`/`Stern`/`Conc`, and the tuple primitives
//! `Order`/`Null`, plus `ItoS`.

use crate::construct::symbol::{Builtin, Value};
use crate::vm::trace::Trace;

/// Applies a single-argument built-in. Returns `Ok(None)` for `Print`,
/// which acts purely for effect; every other built-in returns `Ok(Some(_))`.
///
/// `Conc` takes two arguments and is handled separately by the machine,
/// since its calling convention (see `conc` below) doesn't fit this shape.
pub fn apply(builtin: Builtin, arg: Value) -> Result<Option<Value>, Trace> {
    use Builtin::*;
    let result = match builtin {
        Print => {
            print!("{}", arg);
            return Ok(None);
        },
        Isinteger => Value::Bool(matches!(arg, Value::Int(_))),
        Isstring => Value::Bool(matches!(arg, Value::Str(_))),
        Istruthvalue => Value::Bool(matches!(arg, Value::Bool(_))),
        Istuple => Value::Bool(matches!(arg, Value::Tuple(_))),
        Isfunction => Value::Bool(false),
        Isdummy => Value::Bool(matches!(arg, Value::Dummy)),
        Stem => match arg {
            Value::Str(s) => Value::Str(s.chars().next().map(|c| c.to_string()).unwrap_or_default()),
            other => return Err(type_error("Stem", &other)),
        },
        Stern => match arg {
            Value::Str(s) => Value::Str(s.chars().skip(1).collect()),
            other => return Err(type_error("Stern", &other)),
        },
        Order => match arg {
            Value::Tuple(items) => Value::Int(items.len() as i64),
            Value::Nil => Value::Int(0),
            other => return Err(type_error("Order", &other)),
        },
        Null => match arg {
            Value::Tuple(items) => Value::Bool(items.is_empty()),
            Value::Nil => Value::Bool(true),
            other => return Err(type_error("Null", &other)),
        },
        ItoS => match arg {
            Value::Int(n) => Value::Str(n.to_string()),
            other => return Err(type_error("ItoS", &other)),
        },
        Conc => return Err(Trace::arity_mismatch(2, 1)),
    };
    Ok(Some(result))
}

/// The two-argument string concatenation built-in. RPAL calls it either as
/// `Conc(s1, s2)`, which arrives here with both operands already paired in
/// a tuple, or as the juxtaposed `Conc s1 s2`, which the machine un-curries
/// into two successive calls before reaching here.
pub fn conc(a: Value, b: Value) -> Result<Value, Trace> {
    match (a, b) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
        (a, b) => Err(Trace::operator_type_error(format!(
            "can't apply 'Conc' to a {} and a {}", a.type_name(), b.type_name(),
        ))),
    }
}

fn type_error(name: &str, arg: &Value) -> Trace {
    Trace::operator_type_error(format!("can't apply '{}' to a {}", name, arg.type_name()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn print_has_no_result() {
        assert_eq!(apply(Builtin::Print, Value::Int(1)), Ok(None));
    }

    #[test]
    fn order_of_tuple() {
        let tuple = Value::Tuple(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(apply(Builtin::Order, tuple), Ok(Some(Value::Int(2))));
    }

    #[test]
    fn null_of_nil_is_true() {
        assert_eq!(apply(Builtin::Null, Value::Nil), Ok(Some(Value::Bool(true))));
    }

    #[test]
    fn stem_and_stern_split_first_character() {
        let s = Value::Str("hello".to_string());
        assert_eq!(apply(Builtin::Stem, s.clone()), Ok(Some(Value::Str("h".to_string()))));
        assert_eq!(apply(Builtin::Stern, s), Ok(Some(Value::Str("ello".to_string()))));
    }

    #[test]
    fn conc_concatenates_strings() {
        let result = conc(Value::Str("foo".to_string()), Value::Str("bar".to_string()));
        assert_eq!(result, Ok(Value::Str("foobar".to_string())));
    }

    #[test]
    fn itos_renders_decimal() {
        assert_eq!(apply(Builtin::ItoS, Value::Int(42)), Ok(Some(Value::Str("42".to_string()))));
    }
}
