//! Template tree.
//!
//! A template is tokenized once into plain text and tagged blocks, then
//! rendered by walking the tree. Blocks nest; rendering is outermost-first,
//! so a false `<if>` drops its whole subtree without looking inside it.
//!
//! Every block keeps the raw text of its tags, which lets a render expand only
//! some block kinds (see [`Passes`]) and re-emit the rest verbatim.

mod parse;
mod render;


use std::fmt;
use std::ops::BitOr;

use crate::cleanup::cleanup;
use crate::foreach::ForeachAttrs;
use crate::placeholder::{extract_params, substitute, unseal};
use crate::value::Params;

/// Kinds of markup block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    If,
    Foreach,
    Set,
    Where,
}

impl BlockKind {
    pub fn tag_name(self) -> &'static str {
        match self {
            BlockKind::If => "if",
            BlockKind::Foreach => "foreach",
            BlockKind::Set => "set",
            BlockKind::Where => "where",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            BlockKind::If => 1,
            BlockKind::Foreach => 1 << 1,
            BlockKind::Set => 1 << 2,
            BlockKind::Where => 1 << 3,
        }
    }
}

/// Raw tag text of a block, as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    pub open: String,
    pub close: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfBlock {
    pub test: String,
    pub markup: Markup,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeachBlock {
    pub attrs: ForeachAttrs,
    pub markup: Markup,
    pub body: Vec<Node>,
}

/// A `<set>` or `<where>` block. Neither takes attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub markup: Markup,
    pub body: Vec<Node>,
}

/// One node of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    If(IfBlock),
    Foreach(ForeachBlock),
    Set(Section),
    Where(Section),
}

impl Node {
    pub fn kind(&self) -> Option<BlockKind> {
        match self {
            Node::Text(_) => None,
            Node::If(_) => Some(BlockKind::If),
            Node::Foreach(_) => Some(BlockKind::Foreach),
            Node::Set(_) => Some(BlockKind::Set),
            Node::Where(_) => Some(BlockKind::Where),
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Text(_) => &[],
            Node::If(b) => &b.body,
            Node::Foreach(b) => &b.body,
            Node::Set(s) | Node::Where(s) => &s.body,
        }
    }
}

/// Which block kinds a render expands. The rest are copied through verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Passes(u8);

impl Passes {
    pub const NONE: Passes = Passes(0);
    pub const IF: Passes = Passes(BlockKind::If.bit());
    pub const FOREACH: Passes = Passes(BlockKind::Foreach.bit());
    pub const SET: Passes = Passes(BlockKind::Set.bit());
    pub const WHERE: Passes = Passes(BlockKind::Where.bit());
    pub const ALL: Passes = Passes(0b1111);
    /// Substitute `<foreach>` fragments as they are built and seal them.
    pub(crate) const RESOLVE: Passes = Passes(1 << 4);

    pub fn contains(self, kind: BlockKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub(crate) fn resolves(self) -> bool {
        self.0 & Passes::RESOLVE.0 != 0
    }
}

impl BitOr for Passes {
    type Output = Passes;

    fn bitor(self, rhs: Passes) -> Passes {
        Passes(self.0 | rhs.0)
    }
}

/// What went wrong with a tag the parser could not use as a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupIssueKind {
    /// An open tag with no matching close tag. Emitted as text.
    UnclosedTag,
    /// A close tag with no open block of its kind. Emitted as text.
    UnmatchedClose,
    /// A `<foreach>` without a usable `item` attribute. Passed through.
    MissingItem,
}

/// A malformed tag found while parsing. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupIssue {
    pub kind: MarkupIssueKind,
    pub tag: String,
    /// Byte offset of the tag in the template source.
    pub offset: usize,
}

impl fmt::Display for MarkupIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            MarkupIssueKind::UnclosedTag => "unclosed tag",
            MarkupIssueKind::UnmatchedClose => "close tag without open tag",
            MarkupIssueKind::MissingItem => "foreach without item attribute",
        };
        write!(f, "{what} {} at byte {}", self.tag, self.offset)
    }
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    nodes: Vec<Node>,
    issues: Vec<MarkupIssue>,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let (nodes, issues) = parse::parse_nodes(source);
        Self {
            source: source.to_string(),
            nodes,
            issues,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn issues(&self) -> &[MarkupIssue] {
        &self.issues
    }

    /// Placeholder names to prompt for, in order of first appearance.
    pub fn params(&self) -> Vec<String> {
        extract_params(&self.source)
    }

    /// Number of blocks in the tree, nested ones included.
    pub fn block_count(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes
                .iter()
                .map(|n| usize::from(n.kind().is_some()) + count(n.children()))
                .sum()
        }
        count(&self.nodes)
    }

    /// Expand the selected block kinds only. Placeholders outside `<foreach>`
    /// items are left alone and no cleanup runs.
    pub fn render_with(&self, params: &Params, passes: Passes) -> String {
        let mut out = String::with_capacity(self.source.len());
        render::render_nodes(&self.nodes, params, passes, &mut out);
        out
    }

    /// Full render: expand every block, substitute placeholders, clean up.
    ///
    /// Values land in the output exactly once: text spliced in by a
    /// `<foreach>` is not scanned for placeholders again.
    pub fn render(&self, params: &Params) -> String {
        let expanded = self.render_with(params, Passes::ALL | Passes::RESOLVE);
        let sql = cleanup(&unseal(&substitute(&expanded, params)));

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqlpeek.render",
            template_len = self.source.len(),
            params = params.len(),
            blocks = self.block_count(),
            issues = self.issues.len(),
            sql = %crate::log::truncate_for_log(&sql),
            "rendered template"
        );

        sql
    }
}
