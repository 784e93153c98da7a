use std::cmp::min;
use std::fmt;
use std::mem;
use std::str;

use regex::Regex;

use crate::error::{InsertError, MatchError};
use crate::params::Params;
use crate::pattern::{self, ParamKind, ParamSpec};

/// A successful route match.
#[derive(Debug)]
pub struct Match<'n, 'p, T> {
    /// The value registered for the matched route.
    pub value: &'n T,
    /// The parameters captured from the path, in route order.
    pub params: Params<'n, 'p>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum NodeType {
    Root,
    Static,
    Param,
    CatchAll,
}

/// Metadata attached to a parameter or catch-all node.
struct ParamMeta {
    name: String,
    optional: bool,
    regex: Option<CompiledRegex>,
    /// Static bytes between the parameter and the end of its segment,
    /// as in `{file}.json`. Not part of the captured value.
    suffix: Vec<u8>,
}

struct CompiledRegex {
    source: String,
    regex: Regex,
}

impl ParamMeta {
    fn matches(&self, spec: &ParamSpec<'_>, suffix: &[u8]) -> bool {
        self.name == spec.name
            && self.optional == spec.optional
            && self.suffix == suffix
            && self.regex.as_deref() == spec.regex
    }

    fn pattern(&self, catch_all: bool) -> String {
        let mut out = String::from("{");
        out.push_str(&self.name);
        if self.optional {
            out.push('?');
        }
        if catch_all {
            out.push_str(":*");
        } else if let Some(re) = &self.regex {
            out.push(':');
            out.push_str(&re.source);
        }
        out.push('}');
        out.push_str(str::from_utf8(&self.suffix).unwrap_or(""));
        out
    }
}

impl std::ops::Deref for CompiledRegex {
    type Target = str;

    fn deref(&self) -> &str {
        &self.source
    }
}

/// A node in a radix tree, ordered by priority.
///
/// Priority is the number of routes registered in the subtree rooted at
/// this node. It only biases which static child is probed first; the
/// static-before-wildcard rule does not depend on it.
pub struct Node<T> {
    path: Vec<u8>,
    node_type: NodeType,
    /// The first byte of each static child, aligned with `children`.
    indices: Vec<u8>,
    children: Vec<Box<Node<T>>>,
    wild_child: Option<Box<Node<T>>>,
    param: Option<ParamMeta>,
    value: Option<T>,
    priority: u32,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Node {
            path: Vec::new(),
            node_type: NodeType::Static,
            indices: Vec::new(),
            children: Vec::new(),
            wild_child: None,
            param: None,
            value: None,
            priority: 0,
        }
    }
}

impl<T> Node<T> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Node {
            node_type: NodeType::Root,
            ..Node::default()
        }
    }

    /// Inserts a route and its value into the tree.
    ///
    /// Inserting a route that is already registered replaces its value.
    pub fn insert(&mut self, route: &str, value: T) -> Result<(), InsertError> {
        if !route.starts_with('/') {
            return Err(InsertError::MalformedRoute);
        }
        pattern::validate(route.as_bytes())?;

        self.priority += 1;
        if self.path.is_empty() && self.indices.is_empty() && self.wild_child.is_none() {
            self.node_type = NodeType::Root;
            return self.set_route(route.as_bytes(), value);
        }
        self.insert_at(route.as_bytes(), value)
    }

    fn insert_at(&mut self, path: &[u8], value: T) -> Result<(), InsertError> {
        // Find the longest common prefix. The stored path contains no
        // braces, so the prefix contains no parameters either.
        let mut i = 0;
        let max = min(path.len(), self.path.len());
        while i < max && path[i] == self.path[i] {
            i += 1;
        }

        // Split the edge.
        if i < self.path.len() {
            let child = Node {
                path: self.path[i..].to_vec(),
                node_type: NodeType::Static,
                indices: mem::take(&mut self.indices),
                children: mem::take(&mut self.children),
                wild_child: self.wild_child.take(),
                param: None,
                value: self.value.take(),
                priority: self.priority - 1,
            };

            self.indices = vec![self.path[i]];
            self.children = vec![Box::new(child)];
            self.path.truncate(i);
        }

        let rest = &path[i..];
        if rest.is_empty() {
            // The route terminates here; the last registration wins.
            self.value = Some(value);
            return Ok(());
        }

        if rest[0] == b'{' {
            return self.insert_wild(rest, value);
        }

        // Descend into the static child for the next byte, or create one.
        let idx = rest[0];
        if let Some(pos) = self.indices.iter().position(|&c| c == idx) {
            let pos = self.increment_child_prio(pos);
            return self.children[pos].insert_at(rest, value);
        }

        self.indices.push(idx);
        self.children.push(Box::new(Node::default()));
        let pos = self.increment_child_prio(self.indices.len() - 1);
        self.children[pos].set_route(rest, value)
    }

    /// Takes over the remaining route for a node without a path yet,
    /// creating wildcard children as needed.
    fn set_route(&mut self, route: &[u8], value: T) -> Result<(), InsertError> {
        match pattern::find_param(route)? {
            None => {
                self.path = route.to_vec();
                self.value = Some(value);
                Ok(())
            }
            Some(found) => {
                self.path = route[..found.start].to_vec();
                self.insert_wild(&route[found.start..], value)
            }
        }
    }

    /// Inserts the wildcard that starts the remaining route, `rest[0]`
    /// being the opening brace.
    fn insert_wild(&mut self, rest: &[u8], value: T) -> Result<(), InsertError> {
        let found = match pattern::find_param(rest)? {
            Some(found) => found,
            None => return Err(InsertError::InvalidParam),
        };
        let spec = found.spec;
        let after = &rest[found.end..];
        let suffix = pattern::segment_suffix(after)?;
        let tail = &after[suffix.len()..];

        if let Some(wild) = &mut self.wild_child {
            // A wildcard registered at this position must be identical.
            let same_kind = match spec.kind {
                ParamKind::Single => wild.node_type == NodeType::Param,
                ParamKind::CatchAll => wild.node_type == NodeType::CatchAll,
            };
            let same = match &wild.param {
                Some(meta) => same_kind && meta.matches(&spec, suffix),
                None => false,
            };
            if !same {
                return Err(InsertError::Conflict {
                    with: wild.wild_pattern(),
                });
            }

            wild.priority += 1;
            if tail.is_empty() {
                wild.value = Some(value);
                return Ok(());
            }
            return wild.insert_at(tail, value);
        }

        let (node_type, regex) = match spec.kind {
            ParamKind::CatchAll => (NodeType::CatchAll, None),
            ParamKind::Single => {
                let regex = match spec.regex {
                    Some(src) => Some(CompiledRegex {
                        source: src.to_owned(),
                        regex: pattern::compile(spec.name, src)?,
                    }),
                    None => None,
                };
                (NodeType::Param, regex)
            }
        };

        let mut wild = Box::new(Node {
            node_type,
            param: Some(ParamMeta {
                name: spec.name.to_owned(),
                optional: spec.optional,
                regex,
                suffix: suffix.to_vec(),
            }),
            priority: 1,
            ..Node::default()
        });

        if tail.is_empty() {
            wild.value = Some(value);
        } else {
            wild.insert_at(tail, value)?;
        }
        self.wild_child = Some(wild);
        Ok(())
    }

    /// Increments the priority of the given child and reorders if
    /// necessary, returning its new position.
    fn increment_child_prio(&mut self, pos: usize) -> usize {
        self.children[pos].priority += 1;
        let prio = self.children[pos].priority;

        let mut new_pos = pos;
        while new_pos > 0 && self.children[new_pos - 1].priority < prio {
            self.children.swap(new_pos - 1, new_pos);
            new_pos -= 1;
        }

        if new_pos != pos {
            let idx = self.indices.remove(pos);
            self.indices.insert(new_pos, idx);
        }

        new_pos
    }

    fn wild_pattern(&self) -> String {
        match &self.param {
            Some(meta) => meta.pattern(self.node_type == NodeType::CatchAll),
            None => String::new(),
        }
    }

    /// Returns the value registered for the given path, along with the
    /// parameters captured along the way.
    ///
    /// The returned [`MatchError`] carries a trailing slash
    /// recommendation, see [`MatchError::tsr`].
    pub fn at<'n, 'p>(&'n self, path: &'p str) -> Result<Match<'n, 'p, T>, MatchError> {
        if path.is_empty() {
            return Err(MatchError::new(false));
        }

        let mut params = Params::new();
        match self.walk(path.as_bytes(), &mut params) {
            Ok(value) => Ok(Match { value, params }),
            Err(tsr) => Err(MatchError::new(tsr)),
        }
    }

    fn walk<'n, 'p>(
        &'n self,
        path: &'p [u8],
        params: &mut Params<'n, 'p>,
    ) -> Result<&'n T, bool> {
        let prefix = &self.path;

        if path.len() > prefix.len() {
            if &path[..prefix.len()] == prefix.as_slice() {
                let rest = &path[prefix.len()..];

                // A static child always wins over the wildcard; the
                // wildcard is only probed once the static subtree fails.
                let mut tsr = rest == b"/" && self.value.is_some();
                if let Some(pos) = self.indices.iter().position(|&c| c == rest[0]) {
                    let mark = params.len();
                    match self.children[pos].walk(rest, params) {
                        Ok(value) => return Ok(value),
                        Err(t) => {
                            params.truncate(mark);
                            tsr = tsr || t;
                        }
                    }
                }

                if let Some(wild) = &self.wild_child {
                    return match wild.walk_wild(rest, params) {
                        Ok(value) => Ok(value),
                        Err(t) => Err(tsr || t),
                    };
                }
                return Err(tsr);
            }
        } else if path == prefix.as_slice() {
            // The path is fully consumed at this node.
            if let Some(value) = &self.value {
                return Ok(value);
            }

            // An optional parameter or a catch-all absorbs the empty
            // remainder. The root path matches only a literal `/`.
            let at_root = self.node_type == NodeType::Root && path == b"/";
            if !at_root && self.wild_matches_empty() {
                if let Some(wild) = &self.wild_child {
                    if let (Some(value), Some(meta)) = (&wild.value, &wild.param) {
                        params.push(&meta.name, "");
                        return Ok(value);
                    }
                }
            }

            // Recommend adding a trailing slash when the slash variant
            // is registered.
            if let Some(pos) = self.indices.iter().position(|&c| c == b'/') {
                let child = &self.children[pos];
                let tsr = child.path == b"/"
                    && (child.value.is_some() || child.wild_matches_empty());
                return Err(tsr);
            }
            return Err(false);
        }

        // Recommend removing the trailing slash when this node holds
        // exactly the path without it.
        let tsr = prefix.len() == path.len() + 1
            && prefix[path.len()] == b'/'
            && path == &prefix[..path.len()]
            && (self.value.is_some() || self.wild_matches_empty());
        Err(tsr)
    }

    fn walk_wild<'n, 'p>(
        &'n self,
        rest: &'p [u8],
        params: &mut Params<'n, 'p>,
    ) -> Result<&'n T, bool> {
        let meta = match &self.param {
            Some(meta) => meta,
            None => return Err(false),
        };

        match self.node_type {
            NodeType::Param => {
                // Capture up to the end of the segment.
                let end = rest
                    .iter()
                    .position(|&c| c == b'/')
                    .unwrap_or(rest.len());
                let segment = &rest[..end];

                let captured = match strip_suffix(segment, &meta.suffix) {
                    Some(captured) => captured,
                    None => return Err(false),
                };
                if captured.is_empty() && !meta.optional {
                    return Err(false);
                }
                let captured = match str::from_utf8(captured) {
                    Ok(captured) => captured,
                    Err(_) => return Err(false),
                };
                // A failed regex fails the whole branch; there is no
                // other wildcard to fall back to.
                if !captured.is_empty() {
                    if let Some(re) = &meta.regex {
                        if !re.regex.is_match(captured) {
                            return Err(false);
                        }
                    }
                }

                params.push(&meta.name, captured);

                if end < rest.len() {
                    // More path beyond this segment.
                    if let Some(pos) = self.indices.iter().position(|&c| c == b'/') {
                        return match self.children[pos].walk(&rest[end..], params) {
                            Ok(value) => Ok(value),
                            Err(t) => {
                                Err(t || (rest.len() == end + 1 && self.value.is_some()))
                            }
                        };
                    }
                    let tsr = rest.len() == end + 1 && self.value.is_some();
                    return Err(tsr);
                }

                if let Some(value) = &self.value {
                    return Ok(value);
                }
                if let Some(pos) = self.indices.iter().position(|&c| c == b'/') {
                    let child = &self.children[pos];
                    let tsr = child.path == b"/"
                        && (child.value.is_some() || child.wild_matches_empty());
                    return Err(tsr);
                }
                Err(false)
            }
            NodeType::CatchAll => {
                // The separating slash belongs to the parent's path, so
                // the remainder is captured verbatim.
                let captured = match str::from_utf8(rest) {
                    Ok(captured) => captured,
                    Err(_) => return Err(false),
                };
                match &self.value {
                    Some(value) => {
                        params.push(&meta.name, captured);
                        Ok(value)
                    }
                    None => Err(false),
                }
            }
            _ => Err(false),
        }
    }

    /// Whether the wildcard child would match an empty remainder: a
    /// catch-all, or an optional parameter without a suffix.
    fn wild_matches_empty(&self) -> bool {
        match &self.wild_child {
            Some(wild) => {
                wild.value.is_some()
                    && match wild.node_type {
                        NodeType::CatchAll => true,
                        NodeType::Param => match &wild.param {
                            Some(meta) => meta.optional && meta.suffix.is_empty(),
                            None => false,
                        },
                        _ => false,
                    }
            }
            None => false,
        }
    }

    #[cfg(test)]
    fn check_priorities(&self) -> Result<u32, (u32, u32)> {
        let mut prio = 0;
        for child in &self.children {
            prio += child.check_priorities()?;
        }
        if let Some(wild) = &self.wild_child {
            prio += wild.check_priorities()?;
        }
        if self.value.is_some() {
            prio += 1;
        }
        if self.priority != prio {
            return Err((self.priority, prio));
        }
        Ok(prio)
    }
}

fn strip_suffix<'a>(segment: &'a [u8], suffix: &[u8]) -> Option<&'a [u8]> {
    if suffix.is_empty() {
        return Some(segment);
    }
    if segment.len() < suffix.len() || !segment.ends_with(suffix) {
        return None;
    }
    Some(&segment[..segment.len() - suffix.len()])
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("path", &String::from_utf8_lossy(&self.path))
            .field("node_type", &self.node_type)
            .field("value", &self.value)
            .field("priority", &self.priority)
            .field("wild_child", &self.wild_child)
            .field("children", &self.children)
            .finish()
    }
}
