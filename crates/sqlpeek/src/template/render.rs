use super::{BlockKind, Markup, Node, Passes};
use crate::clauses::{normalize_where_body, repair_set_body};
use crate::condition::eval_condition;
use crate::foreach::{coerce_list, expand};
use crate::value::Params;

pub(super) fn render_nodes(nodes: &[Node], params: &Params, passes: Passes, out: &mut String) {
    for node in nodes {
        render_node(node, params, passes, out);
    }
}

fn render_node(node: &Node, params: &Params, passes: Passes, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::If(block) => {
            if !passes.contains(BlockKind::If) {
                verbatim(&block.markup, &block.body, params, passes, out);
            } else if eval_condition(&block.test, params) {
                render_nodes(&block.body, params, passes, out);
            }
        }
        Node::Foreach(block) => match block.attrs.item.as_deref() {
            Some(item) if passes.contains(BlockKind::Foreach) => {
                let body = render_to_string(&block.body, params, passes);
                let elements = coerce_list(params.get(item));

                #[cfg(feature = "tracing")]
                tracing::trace!(
                    target: "sqlpeek.render",
                    item,
                    elements = elements.len(),
                    "expanding foreach"
                );

                let resolve = passes.resolves().then_some(params);
                out.push_str(&expand(&block.attrs, item, &body, &elements, resolve));
            }
            _ => verbatim(&block.markup, &block.body, params, passes, out),
        },
        Node::Set(section) => {
            if passes.contains(BlockKind::Set) {
                let body = render_to_string(&section.body, params, passes);
                out.push_str(&repair_set_body(&body));
            } else {
                verbatim(&section.markup, &section.body, params, passes, out);
            }
        }
        Node::Where(section) => {
            if passes.contains(BlockKind::Where) {
                let body = render_to_string(&section.body, params, passes);
                out.push_str(&normalize_where_body(&body));
            } else {
                verbatim(&section.markup, &section.body, params, passes, out);
            }
        }
    }
}

/// Re-emit a block's tags around its rendered body.
fn verbatim(markup: &Markup, body: &[Node], params: &Params, passes: Passes, out: &mut String) {
    out.push_str(&markup.open);
    render_nodes(body, params, passes, out);
    out.push_str(&markup.close);
}

fn render_to_string(nodes: &[Node], params: &Params, passes: Passes) -> String {
    let mut out = String::new();
    render_nodes(nodes, params, passes, &mut out);
    out
}
