// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The declarations of one run, their logical lines, and built examples.

use std::cell::RefCell;

use indexmap::IndexMap;
use tracing::debug;

use doccheck_interp::{ExampleSource, Value};

use crate::declaration::Declaration;
use crate::error::CheckError;
use crate::reflow::reflow;
use crate::tag::{Tag, TagParser};

/// Index of a declaration in its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub usize);

/// A logical line that carries a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedLine {
    pub line: String,
    pub tag: Tag,
}

/// One declaration and what was extracted from it.
#[derive(Debug)]
pub struct Entry {
    pub declaration: Declaration,
    pub lines: Vec<String>,
    pub tags: Vec<TaggedLine>,
}

/// Declarations under check, in discovery order, plus the example table.
///
/// Built fresh for every run. Examples are keyed by `(declaration, id)` and
/// resolved by identity of the declaration's value.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<Entry>,
    examples: RefCell<IndexMap<(DeclId, u64), Value>>,
}

impl Registry {
    pub fn new(declarations: Vec<Declaration>) -> Self {
        Self {
            entries: declarations
                .into_iter()
                .map(|declaration| Entry {
                    declaration,
                    lines: Vec::new(),
                    tags: Vec::new(),
                })
                .collect(),
            examples: RefCell::new(IndexMap::new()),
        }
    }

    /// Reflow every declaration's documentation into logical lines.
    pub fn extract_lines(&mut self) -> usize {
        let mut total = 0;
        for entry in &mut self.entries {
            entry.lines = entry
                .declaration
                .documentation()
                .into_iter()
                .flat_map(reflow)
                .collect();
            debug!(
                declaration = entry.declaration.name(),
                lines = entry.lines.len(),
                "extracted logical lines"
            );
            total += entry.lines.len();
        }
        total
    }

    /// Classify every logical line. A malformed example marker aborts.
    pub fn parse_tags(&mut self, parser: &TagParser) -> Result<usize, CheckError> {
        let mut total = 0;
        for entry in &mut self.entries {
            let mut tags = Vec::new();
            for line in &entry.lines {
                let tag = parser.parse(line).map_err(|e| CheckError::TagFormat {
                    declaration: entry.declaration.name().to_string(),
                    line: line.clone(),
                    reason: e.to_string(),
                })?;
                if tag != Tag::Plain {
                    tags.push(TaggedLine {
                        line: line.clone(),
                        tag,
                    });
                }
            }
            total += tags.len();
            entry.tags = tags;
        }
        Ok(total)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Entry)> {
        self.entries.iter().enumerate().map(|(i, e)| (DeclId(i), e))
    }

    pub fn get(&self, id: DeclId) -> Option<&Entry> {
        self.entries.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declaration whose value is `target`.
    pub fn find(&self, target: &Value) -> Option<DeclId> {
        self.entries
            .iter()
            .position(|e| e.declaration.value().is_same(target))
            .map(DeclId)
    }

    /// Store an example; returns the value it replaced, if any.
    pub fn store_example(&self, decl: DeclId, id: u64, value: Value) -> Option<Value> {
        self.examples.borrow_mut().insert((decl, id), value)
    }

    pub fn example(&self, decl: DeclId, id: u64) -> Option<Value> {
        self.examples.borrow().get(&(decl, id)).cloned()
    }

    pub fn examples_built(&self) -> usize {
        self.examples.borrow().len()
    }
}

impl ExampleSource for Registry {
    fn example_of(&self, target: &Value, id: u64) -> Option<Value> {
        self.example(self.find(target)?, id)
    }
}
