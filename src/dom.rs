//! Small mutation helpers over the kuchiki tree. All of them are no-ops on
//! missing targets or blank values.

use anyhow::Context as _;
use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink as _;
use maud::Markup;

/// Replaces the node's children with `text` when `text` is not blank.
pub fn set_text(node: &NodeRef, text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    clear_children(node);
    node.append(NodeRef::new_text(text));
    true
}

pub fn set_attr(node: &NodeRef, name: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        return false;
    }
    let Some(el) = node.as_element() else {
        return false;
    };
    el.attributes
        .borrow_mut()
        .insert(name.to_string(), value.to_string());
    true
}

pub fn get_attr(node: &NodeRef, name: &str) -> Option<String> {
    node.as_element()?
        .attributes
        .borrow()
        .get(name)
        .map(|s| s.to_string())
}

pub fn set_href(node: &NodeRef, href: &str) -> bool {
    set_attr(node, "href", href)
}

/// Adds `display: none` to the node's inline style.
pub fn hide(node: &NodeRef) {
    if is_hidden(node) {
        return;
    }
    let Some(el) = node.as_element() else { return };
    let mut attrs = el.attributes.borrow_mut();
    let style = attrs.get("style").unwrap_or("").trim().trim_end_matches(';').to_string();
    let style = if style.is_empty() {
        "display: none".to_string()
    } else {
        format!("{style}; display: none")
    };
    attrs.insert("style", style);
}

/// True when the inline style declares `display: none`, however it is spaced.
pub fn is_hidden(node: &NodeRef) -> bool {
    let Some(style) = get_attr(node, "style") else {
        return false;
    };
    style.split(';').any(|decl| {
        decl.split_once(':').is_some_and(|(prop, value)| {
            prop.trim().eq_ignore_ascii_case("display")
                && value
                    .split_whitespace()
                    .next()
                    .is_some_and(|v| v.eq_ignore_ascii_case("none"))
        })
    })
}

pub fn clear_children(node: &NodeRef) {
    for child in node.children().collect::<Vec<_>>() {
        child.detach();
    }
}

pub fn is_element(node: &NodeRef, local: &str) -> bool {
    node.as_element().is_some_and(|el| &*el.name.local == local)
}

/// Nearest ancestor element named `local` (the node itself excluded).
pub fn closest(node: &NodeRef, local: &str) -> Option<NodeRef> {
    node.ancestors().find(|n| is_element(n, local))
}

/// Detaches every descendant of `root` matching `selector`.
pub fn remove_all(root: &NodeRef, selector: &str) {
    if let Ok(nodes) = root.select(selector) {
        for node in nodes.collect::<Vec<_>>() {
            node.as_node().detach();
        }
    }
}

/// Parses rendered markup into detached nodes ready to be appended.
pub fn fragment(markup: Markup) -> Vec<NodeRef> {
    let doc = kuchiki::parse_html().one(markup.into_string());
    let Ok(body) = doc.select_first("body") else {
        return Vec::new();
    };
    let children = body.as_node().children().collect::<Vec<_>>();
    for child in &children {
        child.detach();
    }
    children
}

/// Parses `html` and detaches the first element matching `selector`. Used for
/// head elements (`meta`, `title`), which the parser never places in `<body>`.
pub fn element(html: &str, selector: &str) -> Option<NodeRef> {
    let doc = kuchiki::parse_html().one(html);
    let node = doc.select_first(selector).ok()?.as_node().clone();
    node.detach();
    Some(node)
}

pub fn append_all(parent: &NodeRef, nodes: Vec<NodeRef>) {
    for node in nodes {
        parent.append(node);
    }
}

pub fn serialize(doc: &NodeRef) -> anyhow::Result<String> {
    let mut out = Vec::new();
    doc.serialize(&mut out).context("serialize page")?;
    String::from_utf8(out).context("page html not utf-8")
}
