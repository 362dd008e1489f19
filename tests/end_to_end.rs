//! End-to-end tests: complete RPAL programs run through `rpal::run`, from
//! source text to a final `Value`.

use proptest::prelude::*;
use rpal::common::source::Source;
use rpal::construct::symbol::Value;

fn eval(src: &str) -> Value {
    let source = Source::source(src);
    rpal::run(&source).unwrap_or_else(|e| panic!("'{}' failed: {}", src, e))
}

#[test]
fn let_binding_prints_and_yields_no_value() {
    // A program whose last form is purely a side effect (`Print`) leaves
    // nothing but the frame's own env marker on the stack at termination.
    assert_eq!(eval("let x = 5 in Print(x)"), Value::Dummy);
}

#[test]
fn let_binding_yields_its_body_value() {
    assert_eq!(eval("let x = 5 in x"), Value::Int(5));
}

#[test]
fn conditional_recursive_factorial() {
    let src = "let Fact n = n eq 0 -> 1 | n * Fact(n-1) in Fact(5)";
    assert_eq!(eval(src), Value::Int(120));
}

#[test]
fn curried_function_of_two_parameters() {
    let src = "let P(x,y) = x + y in P(3,4)";
    assert_eq!(eval(src), Value::Int(7));
}

#[test]
fn tuple_formation_and_one_based_selection() {
    let src = "let T = (1,2,3) in T 2";
    assert_eq!(eval(src), Value::Int(2));
}

#[test]
fn aug_wraps_non_tuple_operands_as_singletons() {
    let src = "'abc' aug 'd'";
    assert_eq!(eval(src), Value::Tuple(vec![Value::Str("abc".to_string()), Value::Str("d".to_string())]));
}

#[test]
fn rec_allows_genuine_self_reference() {
    let src = "let rec F n = n le 0 -> 1 | n * F(n-1) in F(6)";
    assert_eq!(eval(src), Value::Int(720));
}

#[test]
fn rec_print_program_runs_without_panicking() {
    let src = "let rec F n = n le 0 -> 1 | n * F(n-1) in Print(F(6))";
    assert_eq!(eval(src), Value::Dummy);
}

#[test]
fn and_binds_definitions_simultaneously() {
    // `y`'s value expression sees the outer `x`, not the sibling
    // definition's new one: `and` bindings don't leak into each other.
    let src = "let x = 1 in let y = x and x = 2 in x + y";
    assert_eq!(eval(src), Value::Int(3));
}

#[test]
fn order_and_null_of_nil() {
    assert_eq!(eval("Order nil"), Value::Int(0));
    assert_eq!(eval("Null nil"), Value::Bool(true));
}

#[test]
fn within_rebinds_through_an_outer_definition() {
    let src = "let a = 3 within b = a + 1 in b";
    assert_eq!(eval(src), Value::Int(4));
}

#[test]
fn at_infix_application_matches_juxtaposed_gamma() {
    // `@` is sugar for an infix call: `a @ f b` means `f(a, b)`, reachable
    // here through `Conc`'s curried calling convention.
    assert_eq!(eval("('ab' @ Conc 'cd') eq Conc('ab', 'cd')"), Value::Bool(true));
}

#[test]
fn division_by_zero_is_a_trace_error() {
    let source = Source::source("1 / 0");
    assert!(rpal::run(&source).is_err());
}

#[test]
fn undefined_name_is_a_trace_error() {
    let source = Source::source("Print(undefined_name)");
    assert!(rpal::run(&source).is_err());
}

proptest! {
    // Well-formed arithmetic programs never panic the machine: they
    // either produce an integer or report a `Trace` (e.g. overflow),
    // never leave the stack in a shape `Machine::run` can't interpret.
    #[test]
    fn arithmetic_never_panics(a in -1000i64..1000, b in -1000i64..1000) {
        let src = format!("{} + {}", a, b);
        let source = Source::source(&src);
        let _ = rpal::run(&source);
    }

    // `aug` is associative over the flattened-list reading every value
    // gets via `as_list`: augmenting onto an already-built tuple just
    // extends it, regardless of how that tuple was built up.
    #[test]
    fn aug_builds_up_a_flat_tuple_incrementally(n in 1usize..6) {
        let parts: Vec<String> = (0..n).map(|i| i.to_string()).collect();
        let src = format!("nil aug {}", parts.join(" aug "));
        let source = Source::source(&src);
        let result = rpal::run(&source).unwrap();
        let expected = Value::Tuple((0..n as i64).map(Value::Int).collect());
        prop_assert_eq!(result, expected);
    }

    // Every tuple built by the machine reports its own length back
    // through `Order`, and is `Null` only when empty.
    #[test]
    fn order_matches_tuple_arity(n in 0usize..8) {
        let parts: Vec<String> = (0..n).map(|i| i.to_string()).collect();
        let src = format!("Order (nil aug {})", parts.join(" aug "));
        let src = if n == 0 { "Order nil".to_string() } else { src };
        let source = Source::source(&src);
        let result = rpal::run(&source).unwrap();
        prop_assert_eq!(result, Value::Int(n as i64));
    }
}
