use crate::error::{Error, Result};
use crate::parser::{Binding, FunctionBinding, Node, ScopeTable, VariableBinding};

/// Index of a frame in the [`Environment`] arena
pub type FrameId = usize;

/// The global frame, parent of every top-level table
pub const GLOBAL: FrameId = 0;

/// Lexical environment for one evaluation
///
/// Frames live in an arena and point at their parent by index. A frame either
/// borrows a scope table from the AST or holds the argument bindings of one
/// function call, so the tree itself is never modified and every call gets
/// its own activation record.
#[derive(Debug)]
pub struct Environment<'a> {
    /// Arena of frames; index 0 is the global frame
    frames: Vec<Frame<'a>>,
}

/// Single frame in the environment
#[derive(Debug)]
struct Frame<'a> {
    kind: FrameKind<'a>,
    /// Enclosing frame (None for the global frame)
    parent: Option<FrameId>,
}

#[derive(Debug)]
enum FrameKind<'a> {
    Global,
    Table(&'a ScopeTable),
    Call {
        /// Parameter name, argument expression
        args: Vec<(&'a str, &'a Node)>,
        /// Frame the argument expressions are evaluated in
        caller: FrameId,
    },
}

/// What a name resolved to
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    /// Variable; its value is evaluated in `home`, the frame that defines it
    Variable {
        /// The definition
        binding: &'a VariableBinding,
        /// Frame owning the definition
        home: FrameId,
    },
    /// Custom function; calls get a frame whose parent is `home`
    Function {
        /// The definition
        binding: &'a FunctionBinding,
        /// Frame owning the definition
        home: FrameId,
    },
    /// Call-by-name parameter; the expression is evaluated in `caller`
    Argument {
        /// Unevaluated argument
        expr: &'a Node,
        /// Frame of the call site
        caller: FrameId,
    },
}

impl<'a> Environment<'a> {
    /// Creates an environment holding only the global frame
    pub fn new() -> Self {
        Environment {
            frames: vec![Frame {
                kind: FrameKind::Global,
                parent: None,
            }],
        }
    }

    /// Pushes a frame for a node's scope table
    pub fn enter_table(&mut self, parent: FrameId, table: &'a ScopeTable) -> FrameId {
        self.push(FrameKind::Table(table), parent)
    }

    /// Pushes an activation record for a custom function call
    ///
    /// Parameters are paired with arguments by position; unmatched entries on
    /// either side are dropped.
    pub fn enter_call(
        &mut self,
        home: FrameId,
        params: &'a [String],
        args: &'a [Node],
        caller: FrameId,
    ) -> FrameId {
        let args = params
            .iter()
            .map(String::as_str)
            .zip(args.iter())
            .collect();
        self.push(FrameKind::Call { args, caller }, home)
    }

    fn push(&mut self, kind: FrameKind<'a>, parent: FrameId) -> FrameId {
        let id = self.frames.len();
        tracing::debug!(frame = id, parent, "enter frame");
        self.frames.push(Frame {
            kind,
            parent: Some(parent),
        });
        id
    }

    /// Current arena size, for a later [`Environment::release`]
    pub fn mark(&self) -> usize {
        self.frames.len()
    }

    /// Drops every frame pushed since `mark`
    pub fn release(&mut self, mark: usize) {
        if mark > GLOBAL {
            self.frames.truncate(mark);
        }
    }

    /// Resolves `name` starting at `from` and walking outward
    ///
    /// The first match wins, both across frames and within one table.
    pub fn resolve(&self, from: FrameId, name: &str) -> Result<Resolved<'a>> {
        let mut frame_idx = Some(from);
        while let Some(idx) = frame_idx {
            let frame = &self.frames[idx];
            if let Some(found) = frame.lookup(idx, name) {
                return Ok(found);
            }
            frame_idx = frame.parent;
        }
        Err(Error::UnresolvedSymbol {
            name: name.to_string(),
        })
    }

    /// Checks if a name resolves from `from`
    pub fn exists(&self, from: FrameId, name: &str) -> bool {
        self.resolve(from, name).is_ok()
    }

    /// Number of frames between `from` and the global frame, inclusive
    pub fn scope_depth(&self, from: FrameId) -> usize {
        let mut depth = 0;
        let mut frame_idx = Some(from);
        while let Some(idx) = frame_idx {
            depth += 1;
            frame_idx = self.frames[idx].parent;
        }
        depth
    }

    /// Number of live frames, including the global frame
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl<'a> Frame<'a> {
    fn lookup(&self, id: FrameId, name: &str) -> Option<Resolved<'a>> {
        match &self.kind {
            FrameKind::Global => None,
            FrameKind::Table(table) => {
                let table: &'a ScopeTable = *table;
                table.get(name).map(|binding| match binding {
                    Binding::Variable(v) => Resolved::Variable {
                        binding: v,
                        home: id,
                    },
                    Binding::Function(f) => Resolved::Function {
                        binding: f,
                        home: id,
                    },
                })
            }
            FrameKind::Call { args, caller } => args
                .iter()
                .find(|(param, _)| *param == name)
                .map(|(_, expr)| Resolved::Argument {
                    expr: *expr,
                    caller: *caller,
                }),
        }
    }
}

impl Default for Environment<'_> {
    fn default() -> Self {
        Self::new()
    }
}
