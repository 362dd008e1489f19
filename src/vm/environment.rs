use std::collections::HashMap;

use crate::construct::symbol::{Builtin, Symbol};

/// A single scope: a set of bindings plus a pointer to the scope it was
/// created inside. Scopes never rebind a name once it's set, and never
/// shrink; the arena only ever grows as the machine creates new closures'
/// activation frames.
#[derive(Debug, Clone)]
struct Environment {
    parent: Option<usize>,
    bindings: HashMap<String, Symbol>,
}

/// The environment tree, stored as an arena indexed by the same `usize`
/// that `Closure::env` and `Symbol::EnvMarker` carry.
#[derive(Debug, Clone)]
pub struct EnvironmentArena {
    environments: Vec<Environment>,
}

impl EnvironmentArena {
    /// Creates the arena with a single root environment (index 0), with
    /// every named built-in pre-bound in it.
    pub fn new() -> EnvironmentArena {
        let mut bindings = HashMap::new();
        for builtin in Builtin::ALL {
            bindings.insert(builtin.name().to_string(), Symbol::Function(builtin));
        }
        EnvironmentArena {
            environments: vec![Environment { parent: None, bindings }],
        }
    }

    /// Allocates a new child environment, returning its index.
    pub fn create_child(&mut self, parent: usize) -> usize {
        self.environments.push(Environment { parent: Some(parent), bindings: HashMap::new() });
        self.environments.len() - 1
    }

    /// Binds `name` in the environment at `index`.
    pub fn bind(&mut self, index: usize, name: String, value: Symbol) {
        self.environments[index].bindings.insert(name, value);
    }

    /// Looks up `name`, walking up through parent environments.
    pub fn lookup(&self, index: usize, name: &str) -> Option<&Symbol> {
        let mut current = Some(index);
        while let Some(i) = current {
            let env = &self.environments[i];
            if let Some(symbol) = env.bindings.get(name) {
                return Some(symbol);
            }
            current = env.parent;
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::construct::symbol::Value;

    #[test]
    fn lookup_walks_up_parent_chain() {
        let mut arena = EnvironmentArena::new();
        let child = arena.create_child(0);
        arena.bind(child, "x".to_string(), Symbol::Name(Value::Int(5)));

        assert_eq!(arena.lookup(child, "x"), Some(&Symbol::Name(Value::Int(5))));
        assert_eq!(arena.lookup(0, "x"), None);
    }

    #[test]
    fn builtins_are_prebound_in_root() {
        let arena = EnvironmentArena::new();
        assert_eq!(arena.lookup(0, "Print"), Some(&Symbol::Function(Builtin::Print)));
    }

    #[test]
    fn child_shadows_parent() {
        let mut arena = EnvironmentArena::new();
        let child = arena.create_child(0);
        arena.bind(0, "x".to_string(), Symbol::Name(Value::Int(1)));
        arena.bind(child, "x".to_string(), Symbol::Name(Value::Int(2)));

        assert_eq!(arena.lookup(child, "x"), Some(&Symbol::Name(Value::Int(2))));
        assert_eq!(arena.lookup(0, "x"), Some(&Symbol::Name(Value::Int(1))));
    }
}
