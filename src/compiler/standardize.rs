//! Rewrites the surface tree the parser produces into the standardized
//! form the flattener consumes: `let`/`where`/curried `fn`/`within`/`and`/
//! `rec`/`@` are all eliminated in favor of `lambda`, `gamma`, and `tau`.
//!
//! Every definition form (`Assign`, `FcnForm`, `Rec`, `And`, `Within`)
//! reduces to the same shape: a pair of (bound-variable spec, value
//! expression) that a surrounding `let`/`where` turns into
//! `gamma(lambda(vars, body), value)`.

use crate::common::span::Span;
use crate::construct::tree::{NodeValue, STNode};

/// Standardizes an expression-position subtree. Definition forms
/// (`Assign`, `FcnForm`, `Rec`, `And`, `Within`) never appear here directly
/// — they're only ever reached through `standardize_definition`, called
/// from the `Let`/`Where` cases below.
pub fn standardize(node: &STNode) -> STNode {
    let span = node.span.clone();
    match &node.value {
        NodeValue::Let => {
            let children = node.children();
            let (vars, value) = standardize_definition(children[0]);
            let body = standardize(children[1]);
            let lambda = STNode::with_children(NodeValue::Lambda, span.clone(), vec![vars, body]);
            STNode::with_children(NodeValue::Gamma, span, vec![lambda, value])
        },

        NodeValue::Where => {
            let children = node.children();
            let body = standardize(children[0]);
            let (vars, value) = standardize_definition(children[1]);
            let lambda = STNode::with_children(NodeValue::Lambda, span.clone(), vec![vars, body]);
            STNode::with_children(NodeValue::Gamma, span, vec![lambda, value])
        },

        NodeValue::Lambda => {
            let children = node.children();
            let (vbs, body) = children.split_at(children.len() - 1);
            let body = standardize(body[0]);
            curry_lambda(vbs, body, span)
        },

        NodeValue::At(name) => {
            let children = node.children();
            let left = standardize(children[0]);
            let right = standardize(children[1]);
            let callee = STNode::leaf(NodeValue::Id(name.clone()), span.clone());
            let applied_to_left = STNode::with_children(NodeValue::Gamma, span.clone(), vec![callee, left]);
            STNode::with_children(NodeValue::Gamma, span, vec![applied_to_left, right])
        },

        NodeValue::Conditional | NodeValue::Tau | NodeValue::Gamma | NodeValue::Binary(_) | NodeValue::Unary(_) => {
            let children = node.children().into_iter().map(standardize).collect();
            STNode::with_children(node.value.clone(), span, children)
        },

        NodeValue::Id(_) | NodeValue::Int(_) | NodeValue::Str(_) | NodeValue::Bool(_) | NodeValue::Nil | NodeValue::Dummy => {
            node.clone()
        },

        other => unreachable!("{:?} only ever appears inside a definition, not as a free-standing expression", other),
    }
}

/// Standardizes a definition subtree into a (bound-variable spec, value)
/// pair: the names a surrounding `let`/`where` binds, and the expression
/// whose value(s) get bound to them.
fn standardize_definition(node: &STNode) -> (STNode, STNode) {
    let span = node.span.clone();
    match &node.value {
        NodeValue::Assign => {
            let children = node.children();
            (children[0].clone(), standardize(children[1]))
        },

        NodeValue::FcnForm => {
            let children = node.children();
            let name = children[0].clone();
            let vbs = &children[1..children.len() - 1];
            let body = standardize(children[children.len() - 1]);
            (name, curry_lambda(vbs, body, span))
        },

        NodeValue::Rec => {
            let children = node.children();
            let (vars, value) = standardize_definition(children[0]);
            let lambda = STNode::with_children(NodeValue::Lambda, span.clone(), vec![vars.clone(), value]);
            let ystar = STNode::leaf(NodeValue::YStar, span.clone());
            let fixed_point = STNode::with_children(NodeValue::Gamma, span, vec![ystar, lambda]);
            (vars, fixed_point)
        },

        NodeValue::And => {
            let mut vars = vec![];
            let mut values = vec![];
            for child in node.children() {
                let (child_vars, child_value) = standardize_definition(child);
                flatten_comma_into(&mut vars, child_vars);
                values.push(child_value);
            }
            let vars = if vars.len() == 1 {
                vars.pop().unwrap()
            } else {
                STNode::with_children(NodeValue::Comma, span.clone(), vars)
            };
            (vars, STNode::with_children(NodeValue::Tau, span, values))
        },

        NodeValue::Within => {
            let children = node.children();
            let (outer_vars, outer_value) = standardize_definition(children[0]);
            let (inner_vars, inner_value) = standardize_definition(children[1]);
            let lambda = STNode::with_children(NodeValue::Lambda, span.clone(), vec![outer_vars, inner_value]);
            let rebound = STNode::with_children(NodeValue::Gamma, span, vec![lambda, outer_value]);
            (inner_vars, rebound)
        },

        other => unreachable!("{:?} is not a definition form", other),
    }
}

/// Builds `lambda(vb_1, lambda(vb_2, ... lambda(vb_n, body)))` from a flat
/// list of parameter specs, right-associating so each `Vb` curries over
/// the rest. `f x y = E` and `fn x y . E` both go through this.
fn curry_lambda(vbs: &[&STNode], body: STNode, span: Span) -> STNode {
    let mut result = body;
    for vb in vbs.iter().rev() {
        result = STNode::with_children(NodeValue::Lambda, span.clone(), vec![(*vb).clone(), result]);
    }
    result
}

/// Splices a `comma` node's children into `out`, or pushes it whole if it
/// isn't one. Used by `and` to merge several definitions' bound-variable
/// specs (each possibly already a tuple pattern) into one flat list.
fn flatten_comma_into(out: &mut Vec<STNode>, node: STNode) {
    if node.value == NodeValue::Comma {
        out.extend(into_children(node));
    } else {
        out.push(node);
    }
}

/// Tears down an LCRS node into its owned children, consuming it.
fn into_children(node: STNode) -> Vec<STNode> {
    let mut out = vec![];
    let mut cursor = node.left;
    while let Some(boxed) = cursor {
        let mut child = *boxed;
        cursor = child.right.take();
        out.push(child);
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::source::Source;
    use crate::compiler::lex::lex;
    use crate::compiler::parse::parse;
    use crate::construct::symbol::BinOp;

    fn standardized(source: &str) -> STNode {
        let src = Source::source(source);
        let tokens = lex(&src).unwrap();
        let ast = parse(tokens).unwrap();
        standardize(&ast)
    }

    #[test]
    fn let_becomes_gamma_of_lambda() {
        let t = standardized("let x = 1 in x");
        assert_eq!(t.value, NodeValue::Gamma);
        let children = t.children();
        assert_eq!(children[0].value, NodeValue::Lambda);
        assert_eq!(children[0].children()[0].value, NodeValue::Id("x".to_string()));
        assert_eq!(children[1].value, NodeValue::Int(1));
    }

    #[test]
    fn where_swaps_to_the_same_shape_as_let() {
        let t = standardized("x where x = 5");
        assert_eq!(t.value, NodeValue::Gamma);
        let children = t.children();
        assert_eq!(children[0].value, NodeValue::Lambda);
        assert_eq!(children[1].value, NodeValue::Int(5));
    }

    #[test]
    fn curried_fcn_form_nests_lambdas() {
        let t = standardized("let f x y = x + y in f");
        let children = t.children();
        let outer_lambda = children[0];
        assert_eq!(outer_lambda.children()[0].value, NodeValue::Id("f".to_string()));
        let inner = outer_lambda.children()[1];
        assert_eq!(inner.value, NodeValue::Lambda);
        assert_eq!(inner.children()[0].value, NodeValue::Id("x".to_string()));
        let innermost = inner.children()[1];
        assert_eq!(innermost.value, NodeValue::Lambda);
        assert_eq!(innermost.children()[0].value, NodeValue::Id("y".to_string()));
        assert_eq!(innermost.children()[1].value, NodeValue::Binary(BinOp::Add));
    }

    #[test]
    fn rec_wraps_in_a_fixed_point() {
        let t = standardized("let rec f x = f x in f");
        let children = t.children();
        let value = children[1];
        assert_eq!(value.value, NodeValue::Gamma);
        assert_eq!(value.children()[0].value, NodeValue::YStar);
        assert_eq!(value.children()[1].value, NodeValue::Lambda);
    }

    #[test]
    fn and_merges_into_a_comma_and_a_tau() {
        let t = standardized("let x = 1 and y = 2 in x + y");
        let children = t.children();
        let lambda = children[0];
        let vars = lambda.children()[0];
        assert_eq!(vars.value, NodeValue::Comma);
        assert_eq!(vars.children_count(), 2);
        let value = children[1];
        assert_eq!(value.value, NodeValue::Tau);
        assert_eq!(value.children_count(), 2);
    }

    #[test]
    fn at_infix_becomes_nested_gamma() {
        let t = standardized("a @ f b");
        assert_eq!(t.value, NodeValue::Gamma);
        let children = t.children();
        assert_eq!(children[0].value, NodeValue::Gamma);
        assert_eq!(children[0].children()[0].value, NodeValue::Id("f".to_string()));
        assert_eq!(children[0].children()[1].value, NodeValue::Id("a".to_string()));
        assert_eq!(children[1].value, NodeValue::Id("b".to_string()));
    }

    #[test]
    fn literals_pass_through_unchanged() {
        let t = standardized("42");
        assert_eq!(t.value, NodeValue::Int(42));
    }
}
