//! The CSE (Control-Structure-Environment) abstract machine: a stack of
//! closures evaluator that rewrites `Control` by repeatedly consuming its
//! rightmost `Symbol` and dispatching on it, pushing and popping `Stack`
//! and growing the `Environment` tree as lambdas get applied.

use crate::compiler::flatten::ControlStructureMap;
use crate::construct::symbol::{Builtin, Closure, Symbol, Value};
use crate::core::{builtins, operators};
use crate::vm::control::Control;
use crate::vm::environment::EnvironmentArena;
use crate::vm::stack::Stack;
use crate::vm::trace::Trace;

/// The default ceiling on machine cycles, a safety net against runaway
/// evaluation (an infinite loop written in RPAL, not a machine bug).
pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

pub struct Machine {
    control: Control,
    stack: Stack,
    environments: EnvironmentArena,
    env_stack: Vec<usize>,
    cs_map: ControlStructureMap,
    step_limit: usize,
}

impl Machine {
    pub fn new(cs_map: ControlStructureMap) -> Machine {
        Machine::with_step_limit(cs_map, DEFAULT_STEP_LIMIT)
    }

    pub fn with_step_limit(cs_map: ControlStructureMap, step_limit: usize) -> Machine {
        let mut stack = Stack::new();
        stack.push(Symbol::EnvMarker(0));

        let control = Control::from_symbols(cs_map.get(&0).map(Vec::as_slice).unwrap_or(&[]));

        Machine {
            control,
            stack,
            environments: EnvironmentArena::new(),
            env_stack: vec![0],
            cs_map,
            step_limit,
        }
    }

    /// Runs the machine to completion, returning the final value left on
    /// the stack.
    pub fn run(mut self) -> Result<Value, Trace> {
        let mut steps = 0;
        while let Some(symbol) = self.control.pop_rightmost() {
            steps += 1;
            if steps > self.step_limit {
                return Err(Trace::step_limit_exceeded(self.step_limit));
            }
            self.step(symbol)?;
        }

        match self.stack.pop() {
            Some(Symbol::Name(value)) => Ok(value),
            // A purely side-effecting program (its last form was a `Print`
            // call, not a value-producing expression) leaves only the
            // frame's own env marker behind. `dummy` is RPAL's value for
            // exactly this "no meaningful result" case.
            Some(Symbol::EnvMarker(_)) => Ok(Value::Dummy),
            other => panic!("machine terminated with a malformed stack top: {:?}", other),
        }
    }

    fn current_env(&self) -> usize {
        *self.env_stack.last().expect("the environment stack is never empty while the machine runs")
    }

    fn delta(&self, index: usize) -> &[Symbol] {
        self.cs_map.get(&index).map(Vec::as_slice).unwrap_or(&[])
    }

    fn pop_value(&mut self) -> Result<Value, Trace> {
        match self.stack.pop() {
            Some(Symbol::Name(value)) => Ok(value),
            Some(other) => Err(Trace::operator_type_error(format!("expected a value, found {}", other))),
            None => Err(Trace::operator_type_error("the stack is empty")),
        }
    }

    fn step(&mut self, symbol: Symbol) -> Result<(), Trace> {
        match symbol {
            Symbol::Id(name) => self.rule1_name(&name),
            Symbol::Name(value) => {
                self.stack.push(Symbol::Name(value));
                Ok(())
            },
            Symbol::YStar => {
                self.stack.push(Symbol::YStar);
                Ok(())
            },
            Symbol::Lambda { delta, vars } => {
                self.rule2_lambda(delta, vars);
                Ok(())
            },
            Symbol::Gamma => self.rule_gamma(),
            Symbol::EnvMarker(index) => {
                self.rule5_exit_env(index);
                Ok(())
            },
            Symbol::BinaryOp(op) => self.rule6_binop(op),
            Symbol::UnaryOp(op) => self.rule7_unop(op),
            Symbol::Beta => self.rule8_conditional(),
            Symbol::Tau(n) => self.rule9_tuple(n),
            other => Err(Trace::invalid_control_symbol(format!("{} can't appear in control directly", other))),
        }
    }

    /// Rule 1: resolve a free identifier against the current environment.
    fn rule1_name(&mut self, name: &str) -> Result<(), Trace> {
        let value = self.environments.lookup(self.current_env(), name)
            .cloned()
            .ok_or_else(|| Trace::undefined_name(name))?;
        self.stack.push(value);
        Ok(())
    }

    /// Rule 2: a `lambda` instruction becomes a closure over the current
    /// environment.
    fn rule2_lambda(&mut self, delta: usize, vars: Vec<String>) {
        self.stack.push(Symbol::Closure(Closure { vars, delta, env: self.current_env() }));
    }

    /// Dispatches on whatever a `gamma` finds on top of the stack.
    fn rule_gamma(&mut self) -> Result<(), Trace> {
        let top = self.stack.pop().ok_or_else(|| Trace::invalid_stack_symbol_for_gamma("nothing to apply"))?;
        match top {
            Symbol::YStar => self.rule12_apply_ystar(),
            Symbol::Eta(closure) => {
                self.rule13_apply_fixed_point(closure);
                Ok(())
            },
            Symbol::Name(Value::Tuple(items)) => self.rule10_tuple_selection(items),
            Symbol::Closure(closure) => self.apply_lambda(closure),
            Symbol::Function(builtin) => self.rule14_apply_function(builtin),
            other => Err(Trace::invalid_stack_symbol_for_gamma(format!("{}", other))),
        }
    }

    /// Rules 4 and 11: applying a lambda closure to one argument, or to a
    /// tuple of arguments when the closure binds more than one name.
    fn apply_lambda(&mut self, closure: Closure) -> Result<(), Trace> {
        let new_env = self.environments.create_child(closure.env);

        if closure.vars.len() == 1 {
            let arg = self.stack.pop().ok_or_else(|| Trace::arity_mismatch(1, 0))?;
            self.environments.bind(new_env, closure.vars[0].clone(), arg);
        } else {
            match self.stack.pop() {
                Some(Symbol::Name(Value::Tuple(items))) if items.len() == closure.vars.len() => {
                    for (var, item) in closure.vars.iter().zip(items.into_iter()) {
                        self.environments.bind(new_env, var.clone(), Symbol::Name(item));
                    }
                },
                Some(Symbol::Name(Value::Tuple(items))) => {
                    return Err(Trace::arity_mismatch(closure.vars.len(), items.len()));
                },
                Some(_) => return Err(Trace::arity_mismatch(closure.vars.len(), 1)),
                None => return Err(Trace::arity_mismatch(closure.vars.len(), 0)),
            }
        }

        self.stack.push(Symbol::EnvMarker(new_env));
        self.control.append(Symbol::EnvMarker(new_env));
        self.control.append_from(self.delta(closure.delta).to_vec().as_slice());
        self.env_stack.push(new_env);
        Ok(())
    }

    /// Rule 5: a lambda body has finished; tear down its activation frame.
    fn rule5_exit_env(&mut self, index: usize) {
        self.stack.remove_env_marker(index);
        self.env_stack.pop();
    }

    /// Rule 6.
    fn rule6_binop(&mut self, op: crate::construct::symbol::BinOp) -> Result<(), Trace> {
        let a = self.pop_value()?;
        let b = self.pop_value()?;
        let result = operators::binop(op, a, b)?;
        self.stack.push(Symbol::Name(result));
        Ok(())
    }

    /// Rule 7.
    fn rule7_unop(&mut self, op: crate::construct::symbol::UnOp) -> Result<(), Trace> {
        let a = self.pop_value()?;
        let result = operators::unop(op, a)?;
        self.stack.push(Symbol::Name(result));
        Ok(())
    }

    /// Rule 8: pick a branch based on the evaluated condition, and discard
    /// the other one's delta reference.
    fn rule8_conditional(&mut self) -> Result<(), Trace> {
        let chosen = match self.pop_value()? {
            Value::Bool(true) => {
                self.control.pop_rightmost();
                match self.control.pop_rightmost() {
                    Some(Symbol::Delta(i)) => i,
                    other => return Err(Trace::invalid_control_symbol(format!("expected a then-branch delta, found {:?}", other))),
                }
            },
            Value::Bool(false) => {
                let delta_else = match self.control.pop_rightmost() {
                    Some(Symbol::Delta(i)) => i,
                    other => return Err(Trace::invalid_control_symbol(format!("expected an else-branch delta, found {:?}", other))),
                };
                self.control.pop_rightmost();
                delta_else
            },
            other => return Err(Trace::operator_type_error(format!("expected a truthvalue, found a {}", other.type_name()))),
        };
        self.control.append_from(self.delta(chosen).to_vec().as_slice());
        Ok(())
    }

    /// Rule 9: pop `n` values (already in left-to-right order) into a
    /// tuple.
    fn rule9_tuple(&mut self, n: usize) -> Result<(), Trace> {
        let mut items = Vec::with_capacity(n);
        for _ in 0..n {
            items.push(self.pop_value()?);
        }
        self.stack.push(Symbol::Name(Value::Tuple(items)));
        Ok(())
    }

    /// Rule 10: index into a tuple, 1-based.
    fn rule10_tuple_selection(&mut self, items: Vec<Value>) -> Result<(), Trace> {
        let n = match self.pop_value()? {
            Value::Int(n) => n,
            other => return Err(Trace::operator_type_error(format!("expected an integer tuple index, found a {}", other.type_name()))),
        };
        if n < 1 || (n as usize) > items.len() {
            return Err(Trace::tuple_index_out_of_range(n, items.len()));
        }
        self.stack.push(Symbol::Name(items[(n - 1) as usize].clone()));
        Ok(())
    }

    /// Rule 12: `Y*` applied to a lambda closure becomes an eta closure,
    /// the fixed-point value `rec` binds the recursive name to.
    fn rule12_apply_ystar(&mut self) -> Result<(), Trace> {
        match self.stack.pop() {
            Some(Symbol::Closure(closure)) => {
                self.stack.push(Symbol::Eta(closure));
                Ok(())
            },
            other => Err(Trace::invalid_stack_symbol_for_gamma(format!("Y* expects a lambda, found {:?}", other))),
        }
    }

    /// Rule 13: applying an eta closure re-queues two gammas — one to bind
    /// the recursive name to the eta closure itself, one to apply the
    /// resulting value to the real argument still waiting underneath.
    fn rule13_apply_fixed_point(&mut self, closure: Closure) {
        self.stack.push(Symbol::Eta(closure.clone()));
        self.stack.push(Symbol::Closure(closure));
        self.control.append(Symbol::Gamma);
        self.control.append(Symbol::Gamma);
    }

    /// Rule 14: apply a named built-in function.
    fn rule14_apply_function(&mut self, builtin: Builtin) -> Result<(), Trace> {
        let rand = self.stack.pop().ok_or_else(|| Trace::arity_mismatch(1, 0))?;
        match rand {
            // A function value passed where a built-in expects a plain one
            // (e.g. `Isfunction Fact`, `Print Fact`). Re-append the
            // built-in's own name to control so it's resolved and applied
            // again once the closure underneath has been, then delegate
            // the actual application to the same rule that handles a bare
            // `gamma` over a closure/eta.
            Symbol::Closure(closure) => {
                self.control.append(Symbol::Id(builtin.name().to_string()));
                self.apply_lambda(closure)
            },
            Symbol::Eta(closure) => {
                self.control.append(Symbol::Id(builtin.name().to_string()));
                self.rule13_apply_fixed_point(closure);
                Ok(())
            },
            Symbol::Name(Value::Tuple(mut items)) if builtin == Builtin::Conc && items.len() == 2 => {
                let b = items.pop().unwrap();
                let a = items.pop().unwrap();
                let result = builtins::conc(a, b)?;
                self.stack.push(Symbol::Name(result));
                Ok(())
            },
            Symbol::Name(value) if builtin == Builtin::Conc => {
                let second = self.pop_value()?;
                self.control.pop_rightmost(); // the second, now-redundant gamma
                let result = builtins::conc(value, second)?;
                self.stack.push(Symbol::Name(result));
                Ok(())
            },
            Symbol::Name(value) => self.finish_builtin(builtin, value),
            other => Err(Trace::invalid_stack_symbol_for_gamma(format!("{} as an argument to {}", other, builtin.name()))),
        }
    }

    fn finish_builtin(&mut self, builtin: Builtin, arg: Value) -> Result<(), Trace> {
        if let Some(result) = builtins::apply(builtin, arg)? {
            self.stack.push(Symbol::Name(result));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compiler::flatten::flatten;
    use crate::common::span::Span;
    use crate::construct::symbol::{BinOp, UnOp};
    use crate::construct::tree::{NodeValue, STNode};

    fn leaf(value: NodeValue) -> STNode {
        STNode::leaf(value, Span::empty())
    }

    #[test]
    fn evaluates_a_binary_expression() {
        let one = leaf(NodeValue::Int(1));
        let two = leaf(NodeValue::Int(2));
        let add = STNode::with_children(NodeValue::Binary(BinOp::Add), Span::empty(), vec![one, two]);

        let result = Machine::new(flatten(&add)).run().unwrap();
        assert_eq!(result, Value::Int(3));
    }

    #[test]
    fn applies_an_identity_lambda() {
        // (x -> x) 5, i.e. gamma(lambda x. x, 5)
        let param = leaf(NodeValue::Id("x".to_string()));
        let body = leaf(NodeValue::Id("x".to_string()));
        let lambda = STNode::with_children(NodeValue::Lambda, Span::empty(), vec![param, body]);
        let five = leaf(NodeValue::Int(5));
        let gamma = STNode::with_children(NodeValue::Gamma, Span::empty(), vec![lambda, five]);

        let result = Machine::new(flatten(&gamma)).run().unwrap();
        assert_eq!(result, Value::Int(5));
    }

    #[test]
    fn evaluates_a_conditional() {
        let cond = leaf(NodeValue::Bool(false));
        let then_branch = leaf(NodeValue::Int(1));
        let else_branch = leaf(NodeValue::Int(2));
        let node = STNode::with_children(NodeValue::Conditional, Span::empty(), vec![cond, then_branch, else_branch]);

        let result = Machine::new(flatten(&node)).run().unwrap();
        assert_eq!(result, Value::Int(2));
    }

    #[test]
    fn undefined_name_is_a_trace_error() {
        let node = leaf(NodeValue::Id("nope".to_string()));
        let err = Machine::new(flatten(&node)).run().unwrap_err();
        assert_eq!(err, Trace::undefined_name("nope"));
    }

    #[test]
    fn unop_negates_an_integer() {
        let five = leaf(NodeValue::Int(5));
        let node = STNode::with_children(NodeValue::Unary(UnOp::Neg), Span::empty(), vec![five]);
        let result = Machine::new(flatten(&node)).run().unwrap();
        assert_eq!(result, Value::Int(-5));
    }

    #[test]
    fn tuple_formation_and_selection() {
        // (1, 2, 3) applied via gamma to index 2 selects the second element
        let a = leaf(NodeValue::Int(1));
        let b = leaf(NodeValue::Int(2));
        let c = leaf(NodeValue::Int(3));
        let tau = STNode::with_children(NodeValue::Tau, Span::empty(), vec![a, b, c]);
        let index = leaf(NodeValue::Int(2));
        let gamma = STNode::with_children(NodeValue::Gamma, Span::empty(), vec![tau, index]);

        let result = Machine::new(flatten(&gamma)).run().unwrap();
        assert_eq!(result, Value::Int(2));
    }
}
