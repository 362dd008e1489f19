use std::fmt;

/// The closed set of things that can go wrong while the CSE machine runs.
/// Each variant carries just enough to render a useful message; unlike a
/// compile-time `Syntax` error there's no source span to point at, since by
/// the time a `Symbol` reaches the machine it no longer remembers where it
/// came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    UndefinedName(String),
    DivisionByZero,
    OperatorTypeError(String),
    TupleIndexOutOfRange { index: i64, len: usize },
    ArityMismatch { expected: usize, found: usize },
    StepLimitExceeded(usize),
    InvalidControlSymbol(String),
    InvalidStackSymbolForGamma(String),
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::UndefinedName(name) => write!(f, "'{}' is not bound in this environment", name),
            Kind::DivisionByZero => write!(f, "division by zero"),
            Kind::OperatorTypeError(message) => write!(f, "{}", message),
            Kind::TupleIndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for a tuple of length {}", index, len)
            },
            Kind::ArityMismatch { expected, found } => {
                write!(f, "expected {} argument(s), found {}", expected, found)
            },
            Kind::StepLimitExceeded(limit) => {
                write!(f, "exceeded the step limit of {} machine cycles", limit)
            },
            Kind::InvalidControlSymbol(message) => write!(f, "malformed control structure: {}", message),
            Kind::InvalidStackSymbolForGamma(message) => write!(f, "can't apply {}", message),
        }
    }
}

/// A runtime error raised while the CSE machine is stepping through a
/// program. Distinct from `Syntax`, which is raised before the machine ever
/// starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub kind: Kind,
}

impl Trace {
    pub fn new(kind: Kind) -> Trace {
        Trace { kind }
    }

    pub fn undefined_name(name: &str) -> Trace {
        Trace::new(Kind::UndefinedName(name.to_string()))
    }

    pub fn division_by_zero() -> Trace {
        Trace::new(Kind::DivisionByZero)
    }

    pub fn operator_type_error(message: impl Into<String>) -> Trace {
        Trace::new(Kind::OperatorTypeError(message.into()))
    }

    pub fn tuple_index_out_of_range(index: i64, len: usize) -> Trace {
        Trace::new(Kind::TupleIndexOutOfRange { index, len })
    }

    pub fn arity_mismatch(expected: usize, found: usize) -> Trace {
        Trace::new(Kind::ArityMismatch { expected, found })
    }

    pub fn step_limit_exceeded(limit: usize) -> Trace {
        Trace::new(Kind::StepLimitExceeded(limit))
    }

    pub fn invalid_control_symbol(message: impl Into<String>) -> Trace {
        Trace::new(Kind::InvalidControlSymbol(message.into()))
    }

    pub fn invalid_stack_symbol_for_gamma(message: impl Into<String>) -> Trace {
        Trace::new(Kind::InvalidStackSymbolForGamma(message.into()))
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime error: {}", self.kind)
    }
}

impl std::error::Error for Trace {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn displays_division_by_zero() {
        let trace = Trace::division_by_zero();
        assert_eq!(format!("{}", trace), "Runtime error: division by zero");
    }

    #[test]
    fn displays_undefined_name() {
        let trace = Trace::undefined_name("x");
        assert_eq!(format!("{}", trace), "Runtime error: 'x' is not bound in this environment");
    }
}
