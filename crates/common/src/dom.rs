//! In-memory DOM document
//!
//! An arena of nodes indexed by [`NodeId`]. Removing a node frees its whole
//! subtree and the slots are reused by later insertions, so a [`NodeId`] must
//! not be used after its node was removed. Attribute order is preserved so
//! serialization matches what a browser reports through `innerHTML`.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Root,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Element {
    tag_name: String,
    attrs: Vec<(String, String)>,
    /// Form-control value property, once written
    value: Option<String>,
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// A parsed HTML fragment
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Root,
            }],
            free: Vec::new(),
            root: NodeId(0),
        }
    }
}

impl Document {
    /// Parse an HTML fragment
    pub fn parse(html: &str) -> Result<Self> {
        parse_html(html)
    }

    fn push_node(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let node = Node {
            parent,
            children: Vec::new(),
            kind,
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        };
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut Element> {
        match self.nodes.get_mut(node.0).map(|n| &mut n.kind) {
            Some(NodeKind::Element(element)) => Ok(element),
            _ => Err(Error::NotAnElement),
        }
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.push_node(
            None,
            NodeKind::Element(Element {
                tag_name: tag_name.to_ascii_lowercase(),
                attrs: Vec::new(),
                value: None,
            }),
        )
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag_name.as_str())
    }

    /// Elements reachable from the root, in document order
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if self.element(node).is_some() {
                out.push(node);
            }
            stack.extend(self.nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.elements()
            .into_iter()
            .find(|node| self.attr(*node, "id") == Some(id))
    }

    /// Like [`Document::by_id`], failing when the element is absent
    pub fn require(&self, id: &str) -> Result<NodeId> {
        self.by_id(id).ok_or_else(|| Error::missing(id))
    }

    pub fn elements_by_class(&self, class_name: &str) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|node| self.has_class(*node, class_name))
            .collect()
    }

    pub fn elements_by_tag(&self, tag_name: &str) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|node| {
                self.tag_name(*node)
                    .map(|t| t.eq_ignore_ascii_case(tag_name))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// `#id`, `.class` or a bare tag name
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let selector = selector.trim();
        if let Some(id) = selector.strip_prefix('#') {
            if !id.is_empty() {
                return Ok(self.by_id(id).into_iter().collect());
            }
        } else if let Some(class_name) = selector.strip_prefix('.') {
            if !class_name.is_empty() {
                return Ok(self.elements_by_class(class_name));
            }
        } else if !selector.is_empty() && selector.bytes().all(is_tag_char) {
            return Ok(self.elements_by_tag(selector));
        }
        Err(Error::InvalidSelector(selector.to_string()))
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self.element_mut(node)?;
        match element.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => element.attrs.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    pub fn has_class(&self, node: NodeId, class_name: &str) -> bool {
        self.attr(node, "class")
            .map(|classes| classes.split_ascii_whitespace().any(|c| c == class_name))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, node: NodeId, class_name: &str) -> Result<()> {
        let mut tokens = self.class_tokens(node)?;
        if !tokens.iter().any(|c| c == class_name) {
            tokens.push(class_name.to_string());
        }
        self.set_attr(node, "class", &tokens.join(" "))
    }

    /// Remove a class; an element without a `class` attribute is left as is
    pub fn remove_class(&mut self, node: NodeId, class_name: &str) -> Result<()> {
        if self.attr(node, "class").is_none() {
            self.element_mut(node)?;
            return Ok(());
        }
        let mut tokens = self.class_tokens(node)?;
        tokens.retain(|c| c != class_name);
        self.set_attr(node, "class", &tokens.join(" "))
    }

    fn class_tokens(&self, node: NodeId) -> Result<Vec<String>> {
        let element = self.element(node).ok_or(Error::NotAnElement)?;
        let mut tokens: Vec<String> = Vec::new();
        if let Some((_, classes)) = element.attrs.iter().find(|(k, _)| k == "class") {
            for class_name in classes.split_ascii_whitespace() {
                if !tokens.iter().any(|c| c == class_name) {
                    tokens.push(class_name.to_string());
                }
            }
        }
        Ok(tokens)
    }

    /// Form-control value: the written property, else the `value` attribute
    pub fn value(&self, node: NodeId) -> Result<String> {
        let element = self.element(node).ok_or(Error::NotAnElement)?;
        Ok(element
            .value
            .clone()
            .or_else(|| self.attr(node, "value").map(str::to_string))
            .unwrap_or_default())
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) -> Result<()> {
        self.element_mut(node)?.value = Some(value.to_string());
        Ok(())
    }

    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => out.push_str(text),
            _ => {
                for child in &self.nodes[node.0].children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    pub fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<()> {
        self.element_mut(node)?;
        for child in std::mem::take(&mut self.nodes[node.0].children) {
            self.nodes[child.0].parent = None;
            self.release(child);
        }
        if !text.is_empty() {
            self.push_node(Some(node), NodeKind::Text(text.to_string()));
        }
        Ok(())
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.element(parent).is_none() && parent != self.root {
            return Err(Error::NotAnElement);
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Insert `node` as the next sibling of `target`
    pub fn insert_after(&mut self, target: NodeId, node: NodeId) -> Result<()> {
        self.detach(node);
        let parent = self.parent(target).ok_or(Error::DetachedNode)?;
        let siblings = &mut self.nodes[parent.0].children;
        let index = siblings
            .iter()
            .position(|n| *n == target)
            .map(|i| i + 1)
            .unwrap_or(siblings.len());
        siblings.insert(index, node);
        self.nodes[node.0].parent = Some(parent);
        Ok(())
    }

    /// Detach `node` and free its subtree
    pub fn remove_node(&mut self, node: NodeId) {
        if node == self.root {
            return;
        }
        self.detach(node);
        self.release(node);
    }

    fn release(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let slot = &mut self.nodes[id.0];
            stack.append(&mut slot.children);
            slot.parent = None;
            slot.kind = NodeKind::Text(String::new());
            self.free.push(id);
        }
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|n| *n != node);
        }
    }

    /// Serialized children of the root
    pub fn to_html(&self) -> String {
        self.inner_html(self.root)
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in &self.nodes[node.0].children {
            self.write_node(*child, &mut out);
        }
        out
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Root => out.push_str(&self.inner_html(node)),
            NodeKind::Text(text) => {
                let raw = self
                    .parent(node)
                    .and_then(|p| self.tag_name(p))
                    .map(is_raw_text_tag)
                    .unwrap_or(false);
                if raw {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_text(text));
                }
            }
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.tag_name);
                for (name, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                if is_void_tag(&element.tag_name) {
                    return;
                }
                for child in &self.nodes[node.0].children {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(&element.tag_name);
                out.push('>');
            }
        }
    }
}

fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
            | "source" | "track" | "wbr"
    )
}

fn is_raw_text_tag(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

fn is_tag_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b':' || b == b'_'
}

fn is_attr_name_char(b: u8) -> bool {
    !(b.is_ascii_whitespace() || matches!(b, b'/' | b'>' | b'=' | b'"' | b'\''))
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

fn decode_character_references(src: &str) -> String {
    if !src.contains('&') {
        return src.to_string();
    }
    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let decoded = rest.find(';').and_then(|end| {
            let name = &rest[1..end];
            let ch = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => name
                    .strip_prefix("#x")
                    .or_else(|| name.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, end + 1))
        });
        match decoded {
            Some((ch, len)) => {
                out.push(ch);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
        .map(|p| p + from)
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn parse_html(html: &str) -> Result<Document> {
    let mut doc = Document::default();
    let mut stack = vec![doc.root];
    let bytes = html.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i..].starts_with(b"<!--") {
            let end = find_subslice(bytes, i + 4, b"-->")
                .ok_or_else(|| Error::HtmlParse("unclosed HTML comment".into()))?;
            i = end + 3;
            continue;
        }

        if bytes[i..].starts_with(b"<!") {
            let end = find_subslice(bytes, i, b">")
                .ok_or_else(|| Error::HtmlParse("unclosed declaration".into()))?;
            i = end + 1;
            continue;
        }

        if bytes[i] == b'<' && bytes.get(i + 1) == Some(&b'/') {
            let (tag, next) = parse_end_tag(html, i)?;
            i = next;
            if let Some(pos) = stack.iter().rposition(|n| doc.tag_name(*n) == Some(tag.as_str())) {
                if pos > 0 {
                    stack.truncate(pos);
                }
            }
            continue;
        }

        if bytes[i] == b'<' && bytes.get(i + 1).map(|b| b.is_ascii_alphabetic()).unwrap_or(false) {
            let (tag, attrs, self_closing, next) = parse_start_tag(html, i)?;
            i = next;

            let parent = *stack
                .last()
                .ok_or_else(|| Error::HtmlParse("missing parent element".into()))?;
            let node = doc.push_node(
                Some(parent),
                NodeKind::Element(Element {
                    tag_name: tag.clone(),
                    attrs,
                    value: None,
                }),
            );

            if is_raw_text_tag(&tag) {
                let close_tag = format!("</{}", tag);
                let close = find_subslice(bytes, i, close_tag.as_bytes())
                    .ok_or_else(|| Error::HtmlParse(format!("unclosed <{}>", tag)))?;
                if close > i {
                    doc.push_node(Some(node), NodeKind::Text(html[i..close].to_string()));
                }
                let (_, after_end) = parse_end_tag(html, close)?;
                i = after_end;
                continue;
            }

            if !self_closing && !is_void_tag(&tag) {
                stack.push(node);
            }
            continue;
        }

        let text_start = i;
        i += 1;
        while i < bytes.len() && bytes[i] != b'<' {
            i += 1;
        }
        let parent = *stack
            .last()
            .ok_or_else(|| Error::HtmlParse("missing parent element".into()))?;
        doc.push_node(
            Some(parent),
            NodeKind::Text(decode_character_references(&html[text_start..i])),
        );
    }

    Ok(doc)
}

type StartTag = (String, Vec<(String, String)>, bool, usize);

fn parse_start_tag(html: &str, at: usize) -> Result<StartTag> {
    let bytes = html.as_bytes();
    let mut i = at + 1;

    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    let tag = html[tag_start..i].to_ascii_lowercase();
    if tag.is_empty() {
        return Err(Error::HtmlParse("empty tag name".into()));
    }

    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut self_closing = false;

    loop {
        skip_ws(bytes, &mut i);
        if i >= bytes.len() {
            return Err(Error::HtmlParse(format!("unclosed start tag <{}>", tag)));
        }

        if bytes[i] == b'>' {
            i += 1;
            break;
        }

        if bytes[i] == b'/' {
            if bytes.get(i + 1) == Some(&b'>') {
                self_closing = true;
                i += 2;
                break;
            }
            i += 1;
            continue;
        }

        let name_start = i;
        while i < bytes.len() && is_attr_name_char(bytes[i]) {
            i += 1;
        }
        let name = html[name_start..i].to_ascii_lowercase();
        if name.is_empty() {
            return Err(Error::HtmlParse(format!("invalid attribute in <{}>", tag)));
        }

        skip_ws(bytes, &mut i);
        let value = if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            skip_ws(bytes, &mut i);
            parse_attr_value(html, &mut i)?
        } else {
            String::new()
        };

        // First occurrence wins, as in browsers
        if !attrs.iter().any(|(k, _)| *k == name) {
            attrs.push((name, value));
        }
    }

    Ok((tag, attrs, self_closing, i))
}

fn parse_attr_value(html: &str, i: &mut usize) -> Result<String> {
    let bytes = html.as_bytes();
    if *i >= bytes.len() {
        return Err(Error::HtmlParse("missing attribute value".into()));
    }

    if bytes[*i] == b'"' || bytes[*i] == b'\'' {
        let quote = bytes[*i];
        *i += 1;
        let start = *i;
        while *i < bytes.len() && bytes[*i] != quote {
            *i += 1;
        }
        if *i >= bytes.len() {
            return Err(Error::HtmlParse("unclosed quoted attribute value".into()));
        }
        let value = decode_character_references(&html[start..*i]);
        *i += 1;
        return Ok(value);
    }

    let start = *i;
    while *i < bytes.len() && !bytes[*i].is_ascii_whitespace() && bytes[*i] != b'>' {
        if bytes[*i] == b'/' && bytes.get(*i + 1) == Some(&b'>') {
            break;
        }
        *i += 1;
    }
    Ok(decode_character_references(&html[start..*i]))
}

fn parse_end_tag(html: &str, at: usize) -> Result<(String, usize)> {
    let bytes = html.as_bytes();
    let mut i = at + 2;
    skip_ws(bytes, &mut i);

    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    let tag = html[tag_start..i].to_ascii_lowercase();

    while i < bytes.len() && bytes[i] != b'>' {
        i += 1;
    }
    if i >= bytes.len() {
        return Err(Error::HtmlParse("unclosed end tag".into()));
    }
    Ok((tag, i + 1))
}
