//! Fragment-by-fragment stringification

use crate::node::{AtRule, Comment, Declaration, Node, Raws, Root, Rule};

/// Which boundary of its node a fragment carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentRole {
    /// Opening text of a block (`a{`)
    Start,
    /// Closing text of a block (`}`)
    End,
    /// A fragment holding the whole node, or structural text
    Plain,
}

/// Receives the output text one fragment at a time
///
/// `node` is the node the fragment belongs to, or `None` for whitespace and
/// other text with no source of its own.
pub trait Builder {
    fn emit(&mut self, text: &str, node: Option<&Node>, role: FragmentRole);
}

impl Builder for String {
    fn emit(&mut self, text: &str, _node: Option<&Node>, _role: FragmentRole) {
        self.push_str(text);
    }
}

impl Root {
    /// Emit the whole tree through `builder`
    pub fn stringify(&self, builder: &mut dyn Builder) {
        Stringifier { builder }.root(self);
    }
}

struct Stringifier<'a> {
    builder: &'a mut dyn Builder,
}

impl Stringifier<'_> {
    fn root(&mut self, root: &Root) {
        self.body(&root.nodes, &root.raws);
        if let Some(after) = root.raws.after.as_deref().filter(|s| !s.is_empty()) {
            self.builder.emit(after, None, FragmentRole::Plain);
        }
    }

    fn node(&mut self, node: &Node, semicolon: bool) {
        match node {
            Node::Rule(rule) => self.rule(node, rule),
            Node::AtRule(at_rule) => self.at_rule(node, at_rule, semicolon),
            Node::Declaration(decl) => self.declaration(node, decl, semicolon),
            Node::Comment(comment) => self.comment(node, comment),
        }
    }

    fn body(&mut self, nodes: &[Node], raws: &Raws) {
        // trailing comments do not need the semicolon of the last declaration
        let last = nodes
            .iter()
            .rposition(|n| !matches!(n, Node::Comment(_)))
            .unwrap_or(0);

        for (i, child) in nodes.iter().enumerate() {
            if let Some(before) = child.raws().before.as_deref().filter(|s| !s.is_empty()) {
                self.builder.emit(before, None, FragmentRole::Plain);
            }
            self.node(child, i != last || raws.semicolon);
        }
    }

    fn block(&mut self, node: &Node, start: &str, children: &[Node], raws: &Raws) {
        let between = raws.between.as_deref().unwrap_or_default();
        self.builder
            .emit(&format!("{start}{between}{{"), Some(node), FragmentRole::Start);

        if !children.is_empty() {
            self.body(children, raws);
        }
        if let Some(after) = raws.after.as_deref().filter(|s| !s.is_empty()) {
            self.builder.emit(after, None, FragmentRole::Plain);
        }

        self.builder.emit("}", Some(node), FragmentRole::End);
    }

    fn rule(&mut self, node: &Node, rule: &Rule) {
        self.block(node, &rule.selector, &rule.nodes, &rule.raws);
    }

    fn at_rule(&mut self, node: &Node, at_rule: &AtRule, semicolon: bool) {
        let mut name = format!("@{}", at_rule.name);
        match &at_rule.raws.after_name {
            Some(after_name) => name.push_str(after_name),
            None if !at_rule.params.is_empty() => name.push(' '),
            None => {}
        }
        name.push_str(&at_rule.params);

        match &at_rule.nodes {
            Some(children) => self.block(node, &name, children, &at_rule.raws),
            None => {
                let between = at_rule.raws.between.as_deref().unwrap_or_default();
                let end = if semicolon { ";" } else { "" };
                self.builder
                    .emit(&format!("{name}{between}{end}"), Some(node), FragmentRole::Plain);
            }
        }
    }

    fn declaration(&mut self, node: &Node, decl: &Declaration, semicolon: bool) {
        let between = decl.raws.between.as_deref().unwrap_or(":");
        let mut text = format!("{}{}{}", decl.prop, between, decl.value);
        if decl.important {
            text.push_str(" !important");
        }
        if semicolon {
            text.push(';');
        }
        self.builder.emit(&text, Some(node), FragmentRole::Plain);
    }

    fn comment(&mut self, node: &Node, comment: &Comment) {
        let left = comment.raws.left.as_deref().unwrap_or_default();
        let right = comment.raws.right.as_deref().unwrap_or_default();
        self.builder.emit(
            &format!("/*{left}{}{right}*/", comment.text),
            Some(node),
            FragmentRole::Plain,
        );
    }
}
