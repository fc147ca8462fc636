//! CSS nodes and their source descriptors

use std::fmt;
use std::rc::Rc;

use crate::previous_map::{PrevMapSource, PreviousMap, PreviousMapError};

/// A position in an input stylesheet (1-indexed line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Location { line, column }
    }
}

/// A stylesheet a tree was read from
#[derive(Debug)]
pub struct Input {
    /// File path or virtual id
    pub from: String,
    /// Full text of the stylesheet
    pub css: String,
    /// Map left behind by the pass that produced `css`
    pub map: Option<Rc<PreviousMap>>,
}

impl Input {
    pub fn new(css: impl Into<String>, from: impl Into<String>) -> Self {
        Input {
            from: from.into(),
            css: css.into(),
            map: None,
        }
    }

    /// Create an input and pick up the map of a previous pass
    ///
    /// The map comes from `prev` when given, otherwise from an inline
    /// annotation comment in `css`. See [`PreviousMap::from_css`].
    pub fn with_previous_map(
        css: impl Into<String>,
        from: impl Into<String>,
        prev: Option<&PrevMapSource>,
    ) -> Result<Self, PreviousMapError> {
        let mut input = Input::new(css, from);
        input.map = PreviousMap::from_css(&input.css, Some(&input.from), prev)?.map(Rc::new);
        Ok(input)
    }

    /// Attach an already built previous map
    pub fn with_map(mut self, map: Rc<PreviousMap>) -> Self {
        self.map = Some(map);
        self
    }
}

/// Where a node came from
#[derive(Debug, Clone)]
pub struct Source {
    pub start: Option<Location>,
    pub end: Option<Location>,
    pub input: Rc<Input>,
}

impl Source {
    pub fn new(input: &Rc<Input>, start: Location, end: Location) -> Self {
        Source {
            start: Some(start),
            end: Some(end),
            input: Rc::clone(input),
        }
    }
}

/// Whitespace and punctuation kept from the original text
///
/// Unset fields fall back to the compact defaults of the stringifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Raws {
    /// Text before the node
    pub before: Option<String>,
    /// Text between selector/property and `{`/value
    pub between: Option<String>,
    /// Text after the last child, before `}`
    pub after: Option<String>,
    /// Whether the last declaration of a block ends with `;`
    pub semicolon: bool,
    /// Text between `@name` and params
    pub after_name: Option<String>,
    /// Comment padding
    pub left: Option<String>,
    pub right: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub selector: String,
    pub nodes: Vec<Node>,
    pub raws: Raws,
    pub source: Option<Source>,
}

#[derive(Debug, Clone)]
pub struct AtRule {
    pub name: String,
    pub params: String,
    /// `None` for statements such as `@import`, `Some` for blocks
    pub nodes: Option<Vec<Node>>,
    pub raws: Raws,
    pub source: Option<Source>,
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub prop: String,
    pub value: String,
    pub important: bool,
    pub raws: Raws,
    pub source: Option<Source>,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub text: String,
    pub raws: Raws,
    pub source: Option<Source>,
}

#[derive(Debug, Clone)]
pub enum Node {
    Rule(Rule),
    AtRule(AtRule),
    Declaration(Declaration),
    Comment(Comment),
}

impl Rule {
    pub fn new(selector: impl Into<String>) -> Self {
        Rule {
            selector: selector.into(),
            nodes: Vec::new(),
            raws: Raws::default(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_raws(mut self, raws: Raws) -> Self {
        self.raws = raws;
        self
    }

    pub fn append(mut self, node: impl Into<Node>) -> Self {
        self.nodes.push(node.into());
        self
    }
}

impl AtRule {
    /// A statement at-rule without a block
    pub fn new(name: impl Into<String>, params: impl Into<String>) -> Self {
        AtRule {
            name: name.into(),
            params: params.into(),
            nodes: None,
            raws: Raws::default(),
            source: None,
        }
    }

    /// An at-rule with an (initially empty) block
    pub fn block(name: impl Into<String>, params: impl Into<String>) -> Self {
        AtRule {
            nodes: Some(Vec::new()),
            ..AtRule::new(name, params)
        }
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_raws(mut self, raws: Raws) -> Self {
        self.raws = raws;
        self
    }

    /// Append a child, turning a statement into a block if needed
    pub fn append(mut self, node: impl Into<Node>) -> Self {
        self.nodes.get_or_insert_with(Vec::new).push(node.into());
        self
    }
}

impl Declaration {
    pub fn new(prop: impl Into<String>, value: impl Into<String>) -> Self {
        Declaration {
            prop: prop.into(),
            value: value.into(),
            important: false,
            raws: Raws::default(),
            source: None,
        }
    }

    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_raws(mut self, raws: Raws) -> Self {
        self.raws = raws;
        self
    }
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Comment {
            text: text.into(),
            raws: Raws::default(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_raws(mut self, raws: Raws) -> Self {
        self.raws = raws;
        self
    }
}

impl From<Rule> for Node {
    fn from(rule: Rule) -> Self {
        Node::Rule(rule)
    }
}

impl From<AtRule> for Node {
    fn from(at_rule: AtRule) -> Self {
        Node::AtRule(at_rule)
    }
}

impl From<Declaration> for Node {
    fn from(decl: Declaration) -> Self {
        Node::Declaration(decl)
    }
}

impl From<Comment> for Node {
    fn from(comment: Comment) -> Self {
        Node::Comment(comment)
    }
}

impl Node {
    pub fn source(&self) -> Option<&Source> {
        match self {
            Node::Rule(n) => n.source.as_ref(),
            Node::AtRule(n) => n.source.as_ref(),
            Node::Declaration(n) => n.source.as_ref(),
            Node::Comment(n) => n.source.as_ref(),
        }
    }

    pub fn raws(&self) -> &Raws {
        match self {
            Node::Rule(n) => &n.raws,
            Node::AtRule(n) => &n.raws,
            Node::Declaration(n) => &n.raws,
            Node::Comment(n) => &n.raws,
        }
    }

    /// Direct children; empty for leaves
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Rule(n) => &n.nodes,
            Node::AtRule(n) => n.nodes.as_deref().unwrap_or_default(),
            Node::Declaration(_) | Node::Comment(_) => &[],
        }
    }

    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            Node::Comment(comment) => Some(comment),
            _ => None,
        }
    }
}

/// Top of a stylesheet tree
#[derive(Debug, Clone, Default)]
pub struct Root {
    pub nodes: Vec<Node>,
    pub raws: Raws,
}

impl Root {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(mut self, node: impl Into<Node>) -> Self {
        self.nodes.push(node.into());
        self
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.nodes.push(node.into());
    }

    /// Remove and return the child at `index`
    pub fn remove(&mut self, index: usize) -> Node {
        self.nodes.remove(index)
    }

    /// Visit every node below the root, parents before their children
    pub fn walk<F: FnMut(&Node)>(&self, mut visit: F) {
        fn walk_nodes<F: FnMut(&Node)>(nodes: &[Node], visit: &mut F) {
            for node in nodes {
                visit(node);
                walk_nodes(node.children(), visit);
            }
        }
        walk_nodes(&self.nodes, &mut visit);
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.stringify(&mut out);
        f.write_str(&out)
    }
}
