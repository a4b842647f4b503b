//! Conversion of the basic HTML subset into Telegraph's Node JSON.
//!
//! Telegraph pages take their content as a tree of nodes rather than HTML.
//! The input is the output of `recall_core::markup::markdown_v2_to_html`, so
//! only `b`, `i`, `s`, `code`, `pre` and `br` tags plus the `&amp;`, `&lt;`,
//! `&gt;` entities need to be understood. Anything else is kept as text.

use serde::Serialize;

const ALLOWED_TAGS: [&str; 6] = ["b", "i", "s", "code", "pre", "br"];

/// A Telegraph content node: either text or an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Text(String),
    Element(NodeElement),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeElement {
    pub tag: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl NodeElement {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            children: Vec::new(),
        }
    }
}

/// Parse `html` into top-level page nodes.
///
/// Inline content is wrapped in `p` elements; `pre` blocks stay at the top
/// level. Unclosed tags are closed at the end of input and stray closing
/// tags are ignored.
pub fn html_to_nodes(html: &str) -> Vec<Node> {
    let inline = parse_inline(html);

    let mut page = Vec::new();
    let mut paragraph = NodeElement::new("p");
    for node in inline {
        match node {
            Node::Element(el) if el.tag == "pre" => {
                if !paragraph.children.is_empty() {
                    page.push(Node::Element(std::mem::replace(
                        &mut paragraph,
                        NodeElement::new("p"),
                    )));
                }
                page.push(Node::Element(el));
            }
            other => paragraph.children.push(other),
        }
    }
    if !paragraph.children.is_empty() {
        page.push(Node::Element(paragraph));
    }
    page
}

fn parse_inline(html: &str) -> Vec<Node> {
    // Stack of open elements; the bottom entry is the root.
    let mut stack: Vec<NodeElement> = vec![NodeElement::new("")];
    let mut text = String::new();
    let mut rest = html;

    while !rest.is_empty() {
        let Some(lt) = rest.find('<') else {
            text.push_str(rest);
            break;
        };
        text.push_str(&rest[..lt]);
        let after = &rest[lt..];

        let Some((closing, name, consumed)) = parse_tag(after) else {
            text.push('<');
            rest = &after[1..];
            continue;
        };
        rest = &after[consumed..];

        flush_text(&mut text, &mut stack);
        if closing {
            close_tag(&mut stack, name);
        } else if name == "br" {
            push_child(&mut stack, Node::Element(NodeElement::new("br")));
        } else {
            stack.push(NodeElement::new(name));
        }
    }

    flush_text(&mut text, &mut stack);
    while stack.len() > 1 {
        if let Some(el) = stack.pop() {
            push_child(&mut stack, Node::Element(el));
        }
    }
    stack.pop().map(|root| root.children).unwrap_or_default()
}

/// Recognize `<tag>` or `</tag>` for an allowed tag at the start of `s`.
fn parse_tag(s: &str) -> Option<(bool, &'static str, usize)> {
    let gt = s.find('>')?;
    let inner = &s[1..gt];
    let (closing, name) = match inner.strip_prefix('/') {
        Some(name) => (true, name),
        None => (false, inner.trim_end_matches('/').trim_end()),
    };
    let name = ALLOWED_TAGS.into_iter().find(|t| *t == name)?;
    Some((closing, name, gt + 1))
}

fn close_tag(stack: &mut Vec<NodeElement>, name: &str) {
    if !stack.iter().skip(1).any(|el| el.tag == name) {
        return;
    }
    while stack.len() > 1 {
        let Some(el) = stack.pop() else { break };
        let done = el.tag == name;
        push_child(stack, Node::Element(el));
        if done {
            break;
        }
    }
}

fn flush_text(text: &mut String, stack: &mut [NodeElement]) {
    if text.is_empty() {
        return;
    }
    let decoded = decode_entities(text);
    text.clear();
    push_child(stack, Node::Text(decoded));
}

fn push_child(stack: &mut [NodeElement], node: Node) {
    if let Some(top) = stack.last_mut() {
        top.children.push(node);
    }
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}
