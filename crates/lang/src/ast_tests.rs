// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

struct NameCollector(Vec<String>);

impl AstVisitor for NameCollector {
    fn visit_node(&mut self, node: &AstNode) {
        if let AstNode::Call { name, .. } = node {
            self.0.push(name.clone());
        }
        self.walk_node(node);
    }
}

#[test]
fn visitor_collects_nested_call_names() {
    let span = Span::empty(0);
    let inner = AstNode::Call { name: "add".into(), args: vec![], span };
    let outer = AstNode::Call { name: "log".into(), args: vec![inner], span };
    let mut collector = NameCollector(Vec::new());
    collector.visit_node(&outer);
    assert_eq!(collector.0, vec!["log", "add"]);
}
