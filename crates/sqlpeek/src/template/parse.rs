use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::{BlockKind, ForeachBlock, IfBlock, Markup, MarkupIssue, MarkupIssueKind, Node, Section};
use crate::foreach::ForeachAttrs;

/// All tags the parser understands. `<foreach>` is case-insensitive, the
/// others are matched exactly.
const TAG_PATTERN: &str = concat!(
    r#"<if\s+test="(?P<test>[^"]+)">"#,
    r"|(?P<if_end></if>)",
    r"|(?i:<foreach\s+(?P<attrs>[^>]*)>)",
    r"|(?P<foreach_end>(?i:</foreach>))",
    r"|(?P<set><set>)",
    r"|(?P<set_end></set>)",
    r"|(?P<where><where>)",
    r"|(?P<where_end></where>)",
);

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TAG_PATTERN).expect("invalid built-in tag regex"))
}

enum Tag {
    Open(Opening),
    Close(BlockKind),
}

enum Opening {
    If(String),
    Foreach(ForeachAttrs),
    Set,
    Where,
}

impl Opening {
    fn kind(&self) -> BlockKind {
        match self {
            Opening::If(_) => BlockKind::If,
            Opening::Foreach(_) => BlockKind::Foreach,
            Opening::Set => BlockKind::Set,
            Opening::Where => BlockKind::Where,
        }
    }
}

fn classify(caps: &Captures<'_>) -> Tag {
    if let Some(test) = caps.name("test") {
        Tag::Open(Opening::If(test.as_str().to_string()))
    } else if let Some(attrs) = caps.name("attrs") {
        Tag::Open(Opening::Foreach(ForeachAttrs::parse(attrs.as_str())))
    } else if caps.name("set").is_some() {
        Tag::Open(Opening::Set)
    } else if caps.name("where").is_some() {
        Tag::Open(Opening::Where)
    } else if caps.name("if_end").is_some() {
        Tag::Close(BlockKind::If)
    } else if caps.name("foreach_end").is_some() {
        Tag::Close(BlockKind::Foreach)
    } else if caps.name("set_end").is_some() {
        Tag::Close(BlockKind::Set)
    } else {
        Tag::Close(BlockKind::Where)
    }
}

/// An open block still waiting for its close tag.
struct Frame {
    opening: Opening,
    open: String,
    offset: usize,
    body: Vec<Node>,
}

impl Frame {
    fn close(self, close: &str) -> Node {
        let markup = Markup {
            open: self.open,
            close: close.to_string(),
        };
        match self.opening {
            Opening::If(test) => Node::If(IfBlock {
                test,
                markup,
                body: self.body,
            }),
            Opening::Foreach(attrs) => Node::Foreach(ForeachBlock {
                attrs,
                markup,
                body: self.body,
            }),
            Opening::Set => Node::Set(Section {
                markup,
                body: self.body,
            }),
            Opening::Where => Node::Where(Section {
                markup,
                body: self.body,
            }),
        }
    }
}

#[derive(Default)]
struct Builder {
    root: Vec<Node>,
    stack: Vec<Frame>,
    issues: Vec<MarkupIssue>,
}

impl Builder {
    fn current(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.body,
            None => &mut self.root,
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let nodes = self.current();
        if let Some(Node::Text(prev)) = nodes.last_mut() {
            prev.push_str(text);
        } else {
            nodes.push(Node::Text(text.to_string()));
        }
    }

    fn push_node(&mut self, node: Node) {
        match node {
            Node::Text(text) => self.push_text(&text),
            node => self.current().push(node),
        }
    }

    fn issue(&mut self, kind: MarkupIssueKind, tag: &str, offset: usize) {
        self.issues.push(MarkupIssue {
            kind,
            tag: tag.to_string(),
            offset,
        });
    }

    fn open(&mut self, opening: Opening, tag: &str, offset: usize) {
        if let Opening::Foreach(attrs) = &opening {
            if attrs.item.is_none() {
                self.issue(MarkupIssueKind::MissingItem, tag, offset);
            }
        }
        self.stack.push(Frame {
            opening,
            open: tag.to_string(),
            offset,
            body: Vec::new(),
        });
    }

    fn close(&mut self, kind: BlockKind, tag: &str, offset: usize) {
        let Some(pos) = self.stack.iter().rposition(|f| f.opening.kind() == kind) else {
            self.issue(MarkupIssueKind::UnmatchedClose, tag, offset);
            self.push_text(tag);
            return;
        };
        while self.stack.len() > pos + 1 {
            self.unwind_top();
        }
        if let Some(frame) = self.stack.pop() {
            let node = frame.close(tag);
            self.push_node(node);
        }
    }

    /// Give up on the innermost open block: its tag and body become plain
    /// content of the enclosing level.
    fn unwind_top(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        self.issue(MarkupIssueKind::UnclosedTag, &frame.open, frame.offset);
        self.push_text(&frame.open);
        for node in frame.body {
            self.push_node(node);
        }
    }

    fn finish(mut self) -> (Vec<Node>, Vec<MarkupIssue>) {
        while !self.stack.is_empty() {
            self.unwind_top();
        }
        self.issues.sort_by_key(|i| i.offset);
        (self.root, self.issues)
    }
}

pub(super) fn parse_nodes(source: &str) -> (Vec<Node>, Vec<MarkupIssue>) {
    let mut builder = Builder::default();
    let mut last = 0;

    for caps in tag_re().captures_iter(source) {
        let Some(m) = caps.get(0) else {
            continue;
        };
        builder.push_text(&source[last..m.start()]);
        match classify(&caps) {
            Tag::Open(opening) => builder.open(opening, m.as_str(), m.start()),
            Tag::Close(kind) => builder.close(kind, m.as_str(), m.start()),
        }
        last = m.end();
    }
    builder.push_text(&source[last..]);

    let (nodes, issues) = builder.finish();
    #[cfg(feature = "tracing")]
    log_issues(&issues);
    (nodes, issues)
}

#[cfg(feature = "tracing")]
fn log_issues(issues: &[MarkupIssue]) {
    for issue in issues {
        tracing::debug!(target: "sqlpeek.parse", %issue, "malformed markup");
    }
}
