//! Turns a standardized tree into the control structures the CSE machine
//! steps through: a dense map from delta index to the flat sequence of
//! `Symbol`s that control structure holds.
//!
//! The traversal is pre-order: a node's own symbol (if it contributes one)
//! is appended before its children are visited. `lambda`, the conditional,
//! and `tau` nodes are special-cased, since each either spawns a new delta
//! or needs a symbol that carries more than the node itself holds.

use std::collections::HashMap;

use crate::construct::symbol::Symbol;
use crate::construct::tree::{NodeValue, STNode};

pub type ControlStructureMap = HashMap<usize, Vec<Symbol>>;

/// Flattens a standardized tree into its control structure map, rooted at
/// delta-0.
pub fn flatten(root: &STNode) -> ControlStructureMap {
    let mut map = ControlStructureMap::new();
    map.insert(0, vec![]);
    traverse(root, 0, &mut map);
    map
}

/// Allocates a fresh delta index at or after `from`, by linear probing.
fn add_control_struct(map: &mut ControlStructureMap, from: usize) -> usize {
    let mut index = from;
    while map.contains_key(&index) {
        index += 1;
    }
    map.insert(index, vec![]);
    index
}

fn traverse(node: &STNode, delta: usize, map: &mut ControlStructureMap) {
    match &node.value {
        NodeValue::Lambda => handle_lambda(node, delta, map),
        NodeValue::Conditional => handle_conditional(node, delta, map),
        NodeValue::Tau => {
            map.get_mut(&delta).unwrap().push(Symbol::Tau(node.children_count()));
            for child in node.children() {
                traverse(child, delta, map);
            }
        },
        _ => {
            map.get_mut(&delta).unwrap().push(symbol_for(node));
            for child in node.children() {
                traverse(child, delta, map);
            }
        },
    }
}

fn handle_lambda(node: &STNode, delta: usize, map: &mut ControlStructureMap) {
    let children = node.children();
    let bound_spec = children[0];
    let body = children[1];

    let new_delta = add_control_struct(map, delta);
    map.get_mut(&delta).unwrap().push(Symbol::Lambda {
        delta: new_delta,
        vars: bound_spec.bound_vars(),
    });

    traverse(body, new_delta, map);
}

fn handle_conditional(node: &STNode, delta: usize, map: &mut ControlStructureMap) {
    let children = node.children();
    let condition = children[0];
    let then_branch = children[1];
    let else_branch = children[2];

    let delta_then = add_control_struct(map, delta);
    let delta_else = add_control_struct(map, delta_then);

    let cs = map.get_mut(&delta).unwrap();
    cs.push(Symbol::Delta(delta_then));
    cs.push(Symbol::Delta(delta_else));
    cs.push(Symbol::Beta);

    traverse(condition, delta, map);
    traverse(then_branch, delta_then, map);
    traverse(else_branch, delta_else, map);
}

fn symbol_for(node: &STNode) -> Symbol {
    match &node.value {
        NodeValue::Gamma => Symbol::Gamma,
        NodeValue::YStar => Symbol::YStar,
        NodeValue::Id(name) => Symbol::Id(name.clone()),
        NodeValue::Binary(op) => Symbol::BinaryOp(*op),
        NodeValue::Unary(op) => Symbol::UnaryOp(*op),
        NodeValue::Int(_) | NodeValue::Str(_) | NodeValue::Bool(_) | NodeValue::Nil | NodeValue::Dummy => {
            Symbol::Name(node.value.literal().expect("literal node kinds always have a literal value"))
        },
        other => unreachable!("{:?} should have been consumed before reaching the flattener's default case", other),
    }
}
