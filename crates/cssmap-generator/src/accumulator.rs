//! Building the output text and its mappings in one pass

use cssmap_ast::{Builder, FragmentRole, Node};
use cssmap_codec::{Mapping, Position, SourceMapGenerator};

use crate::paths::PathResolver;

/// Collects emitted fragments into the output CSS and its map
///
/// Generated positions are tracked as a 1-indexed line and column, with
/// columns counted in UTF-16 code units as the map format expects. Each
/// fragment that belongs to a node can produce two mappings: the node's
/// start, at the position before the fragment, and its end, at the position
/// after it. `Start` fragments never record the end and `End` fragments
/// never record the start, so a block reports its `{` and `}` separately.
pub struct Accumulator<'a> {
    css: String,
    line: u32,
    column: u32,
    map: SourceMapGenerator,
    paths: &'a mut PathResolver,
}

impl<'a> Accumulator<'a> {
    /// Start an empty output for the generated file `file`
    pub fn new(file: String, paths: &'a mut PathResolver) -> Self {
        Accumulator {
            css: String::new(),
            line: 1,
            column: 1,
            map: SourceMapGenerator::new(Some(file)),
            paths,
        }
    }

    /// Current generated position, 0-indexed column
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column - 1)
    }

    pub fn finish(self) -> (String, SourceMapGenerator) {
        (self.css, self.map)
    }

    fn advance(&mut self, text: &str) {
        match text.rfind('\n') {
            Some(last) => {
                self.line += text.matches('\n').count() as u32;
                self.column = text[last + 1..].encode_utf16().count() as u32 + 1;
            }
            None => {
                self.column += text.encode_utf16().count() as u32;
            }
        }
    }
}

impl Builder for Accumulator<'_> {
    fn emit(&mut self, text: &str, node: Option<&Node>, role: FragmentRole) {
        self.css.push_str(text);
        let source = node.and_then(Node::source);

        if let Some(source) = source
            && let Some(start) = source.start
            && role != FragmentRole::End
        {
            let path = self.paths.relative(&source.input.from);
            self.map.add_mapping(Mapping::original(
                self.position(),
                path,
                Position::new(start.line, start.column.saturating_sub(1)),
            ));
        }

        self.advance(text);

        if let Some(source) = source
            && let Some(end) = source.end
            && role != FragmentRole::Start
        {
            let path = self.paths.relative(&source.input.from);
            self.map.add_mapping(Mapping::original(
                self.position(),
                path,
                Position::new(end.line, end.column),
            ));
        }
    }
}
