//! Arena-backed syntax tree for one source unit.
//!
//! Statements and statement lists are addressed by [`StmtId`] and [`BlockId`].
//! Handles stay valid for the whole life of the tree: removal only unlinks a
//! statement from its parent list, the slot itself is kept.
//!
//! Every mutation goes through [`SyntaxTree::replace_stmt`],
//! [`SyntaxTree::append_stmt`], [`SyntaxTree::remove_stmt`] or
//! [`SyntaxTree::push_class_member`]. Each one marks the touched slot and its
//! ancestor chain dirty; the printer copies clean regions from the source.

use super::*;
use crate::visit::{walk_function, Child, Visit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StmtId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub usize);

/// Where a statement slot's node came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Parsed from source and never replaced
    Parsed,
    /// Parsed slot whose node was swapped; trivia and comments are kept
    Replaced,
    /// Created by a mutation, has no source text
    Synthesized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    /// Member of a statement list
    Block(BlockId),
    /// Direct body of another statement (`if`, loops, labels, `export`)
    Stmt(StmtId),
    /// Not linked yet
    Detached,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StmtSlot {
    pub node: Node<Stmt>,
    /// Whitespace and comments between the previous sibling and this statement
    pub leading: Span,
    /// End of a same-line comment following the statement, or `node.span.end`
    pub trailing_end: usize,
    /// Comments attached to the statement (those inside `leading`)
    pub comments: Vec<Comment>,
    pub origin: Origin,
    pub parent: Parent,
    pub dirty: bool,
    pub removed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockSlot {
    pub stmts: Vec<StmtId>,
    /// Full extent, delimiters included
    pub span: Span,
    /// Offset just past the opening delimiter
    pub open_end: usize,
    /// Trailing offset of the last parsed statement (or `open_end`)
    pub trailing_start: usize,
    /// Statement that contains this block; `None` for the program body
    pub owner: Option<StmtId>,
    pub dirty: bool,
}

impl BlockSlot {
    pub fn new(span: Span, open_end: usize) -> Self {
        Self {
            stmts: Vec::new(),
            span,
            open_end,
            trailing_start: open_end,
            owner: None,
            dirty: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    pub source: String,
    pub file_id: usize,
    stmts: Vec<StmtSlot>,
    blocks: Vec<BlockSlot>,
    root: BlockId,
    comments: Vec<Comment>,
}

impl SyntaxTree {
    /// Creates a tree whose program body spans the whole source.
    pub fn new(source: impl Into<String>, file_id: usize) -> Self {
        let source = source.into();
        let root = BlockSlot::new(Span::new(0, source.len(), file_id), 0);
        Self {
            source,
            file_id,
            stmts: Vec::new(),
            blocks: vec![root],
            root: BlockId(0),
            comments: Vec::new(),
        }
    }

    // =========================================================================
    // Construction (used by the parser)
    // =========================================================================

    pub fn alloc_stmt(
        &mut self,
        node: Node<Stmt>,
        leading: Span,
        trailing_end: usize,
        comments: Vec<Comment>,
    ) -> StmtId {
        let id = StmtId(self.stmts.len());
        self.stmts.push(StmtSlot {
            node,
            leading,
            trailing_end,
            comments,
            origin: Origin::Parsed,
            parent: Parent::Detached,
            dirty: false,
            removed: false,
        });
        id
    }

    pub fn alloc_block(&mut self, block: BlockSlot) -> BlockId {
        let id = BlockId(self.blocks.len());
        self.blocks.push(block);
        id
    }

    /// Sets the program body list.
    pub fn set_root_stmts(&mut self, stmts: Vec<StmtId>, trailing_start: usize) {
        let root = &mut self.blocks[self.root.0];
        root.stmts = stmts;
        root.trailing_start = trailing_start;
    }

    pub fn set_comments(&mut self, comments: Vec<Comment>) {
        self.comments = comments;
    }

    /// Establishes parent and owner links with one walk from the program body.
    pub fn link_parents(&mut self) {
        let mut pending = vec![self.root];
        while let Some(block) = pending.pop() {
            let stmts = self.blocks[block.0].stmts.clone();
            for id in stmts {
                self.stmts[id.0].parent = Parent::Block(block);
                self.link_stmt(id, &mut pending);
            }
        }
    }

    fn link_stmt(&mut self, id: StmtId, pending: &mut Vec<BlockId>) {
        for child in self.children(id) {
            match child {
                Child::Block(block) => {
                    self.blocks[block.0].owner = Some(id);
                    pending.push(block);
                }
                Child::Stmt(nested) => {
                    self.stmts[nested.0].parent = Parent::Stmt(id);
                    self.link_stmt(nested, pending);
                }
            }
        }
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn root(&self) -> BlockId {
        self.root
    }

    pub fn stmt(&self, id: StmtId) -> &Node<Stmt> {
        &self.stmts[id.0].node
    }

    pub fn slot(&self, id: StmtId) -> &StmtSlot {
        &self.stmts[id.0]
    }

    pub fn block(&self, id: BlockId) -> &BlockSlot {
        &self.blocks[id.0]
    }

    pub fn block_stmts(&self, id: BlockId) -> &[StmtId] {
        &self.blocks[id.0].stmts
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Source text covered by `span`; empty for synthesized spans.
    pub fn text(&self, span: Span) -> &str {
        if span.is_synthesized() {
            return "";
        }
        self.source.get(span.start..span.end).unwrap_or("")
    }

    /// True when any statement or block was mutated.
    pub fn is_modified(&self) -> bool {
        self.blocks[self.root.0].dirty
    }

    /// Blocks and statements directly nested in a statement, in source order.
    pub fn children(&self, id: StmtId) -> Vec<Child> {
        let mut collector = ChildCollector::default();
        collector.collect_stmt(self, id);
        collector.children
    }

    /// Every live statement, parents before children, in source order.
    pub fn preorder(&self) -> Vec<StmtId> {
        let mut out = Vec::new();
        self.preorder_block(self.root, &mut out);
        out
    }

    fn preorder_block(&self, block: BlockId, out: &mut Vec<StmtId>) {
        for &id in &self.blocks[block.0].stmts {
            self.preorder_stmt(id, out);
        }
    }

    fn preorder_stmt(&self, id: StmtId, out: &mut Vec<StmtId>) {
        out.push(id);
        for child in self.children(id) {
            match child {
                Child::Block(block) => self.preorder_block(block, out),
                Child::Stmt(nested) => self.preorder_stmt(nested, out),
            }
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Swaps the node of a statement, keeping its slot, trivia and comments.
    pub fn replace_stmt(&mut self, id: StmtId, stmt: Stmt) {
        let slot = &mut self.stmts[id.0];
        slot.node.value = stmt;
        if slot.origin == Origin::Parsed {
            slot.origin = Origin::Replaced;
        }
        self.mark_stmt_dirty(id);
    }

    /// Appends a generated statement as the new last entry of `block`.
    pub fn append_stmt(&mut self, block: BlockId, stmt: Stmt) -> StmtId {
        let id = StmtId(self.stmts.len());
        self.stmts.push(StmtSlot {
            node: Node::synthesized(stmt),
            leading: Span::synthesized(),
            trailing_end: 0,
            comments: Vec::new(),
            origin: Origin::Synthesized,
            parent: Parent::Block(block),
            dirty: true,
            removed: false,
        });
        self.blocks[block.0].stmts.push(id);
        self.mark_block_dirty(block);
        id
    }

    /// Unlinks a statement from its list. The direct body of another
    /// statement cannot be unlinked and becomes an empty statement instead.
    pub fn remove_stmt(&mut self, id: StmtId) {
        match self.stmts[id.0].parent {
            Parent::Block(block) => {
                self.blocks[block.0].stmts.retain(|&s| s != id);
                self.stmts[id.0].removed = true;
                self.mark_block_dirty(block);
            }
            Parent::Stmt(_) => self.replace_stmt(id, Stmt::Empty),
            Parent::Detached => {
                self.stmts[id.0].removed = true;
            }
        }
    }

    /// Appends a member to a class declaration statement and moves ownership
    /// of the member's blocks to that statement. Returns false when `class_stmt`
    /// is not a class declaration.
    pub fn push_class_member(&mut self, class_stmt: StmtId, member: ClassMember) -> bool {
        let blocks = member_blocks(self, &member);
        match &mut self.stmts[class_stmt.0].node.value {
            Stmt::Class(class) => class.members.push(member),
            _ => return false,
        }
        for block in blocks {
            self.blocks[block.0].owner = Some(class_stmt);
        }
        self.mark_stmt_dirty(class_stmt);
        true
    }

    fn mark_stmt_dirty(&mut self, id: StmtId) {
        let slot = &mut self.stmts[id.0];
        slot.dirty = true;
        match slot.parent {
            Parent::Block(block) => self.mark_block_dirty(block),
            Parent::Stmt(parent) => self.mark_stmt_dirty(parent),
            Parent::Detached => {}
        }
    }

    fn mark_block_dirty(&mut self, id: BlockId) {
        let block = &mut self.blocks[id.0];
        block.dirty = true;
        if let Some(owner) = block.owner {
            self.mark_stmt_dirty(owner);
        }
    }
}

/// Blocks reachable from a class member without entering another statement.
fn member_blocks(tree: &SyntaxTree, member: &ClassMember) -> Vec<BlockId> {
    let mut collector = ChildCollector::default();
    match member {
        ClassMember::Method(method) => walk_function(&mut collector, tree, &method.value.function),
        ClassMember::Property(property) => {
            if let Some(value) = &property.value.value {
                collector.visit_expr(tree, value);
            }
        }
        ClassMember::StaticBlock(block) => collector.visit_block(tree, block.value),
    }
    collector
        .children
        .into_iter()
        .filter_map(|child| match child {
            Child::Block(block) => Some(block),
            Child::Stmt(_) => None,
        })
        .collect()
}

/// Collects direct children without descending into them.
#[derive(Default)]
struct ChildCollector {
    children: Vec<Child>,
}

impl ChildCollector {
    fn collect_stmt(&mut self, tree: &SyntaxTree, id: StmtId) {
        crate::visit::walk_stmt(self, tree, id);
    }
}

impl Visit for ChildCollector {
    fn visit_stmt(&mut self, _tree: &SyntaxTree, id: StmtId) {
        self.children.push(Child::Stmt(id));
    }

    fn visit_block(&mut self, _tree: &SyntaxTree, block: BlockId) {
        self.children.push(Child::Block(block));
    }
}
