//! Reserved-key reference walker.
//!
//! Lazy depth-first visitor over a `serde_json::Value` tree. Map entries are
//! visited in insertion order. The reserved key is a leaf: its value yields
//! references (one for a string, one per string element for a list) and is
//! never descended into. Other map values are descended into, and list values
//! are descended into only through their map elements.

use crate::types::FieldPath;
use serde_json::{Map, Value};

/// One occurrence of an asset path inside a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference<'a> {
    pub location: FieldPath,
    pub stored: &'a str,
}

impl Reference<'_> {
    /// RFC 6901 pointer addressing this reference inside its document.
    pub fn pointer(&self) -> String {
        to_pointer(&self.location)
    }
}

/// Location rendered for humans: `a -> b -> template -> 0`.
pub fn display_location(location: &[String]) -> String {
    location.join(" -> ")
}

pub fn to_pointer(location: &[String]) -> String {
    location.iter().fold(String::new(), |mut acc, segment| {
        acc.push('/');
        acc.push_str(&segment.replace('~', "~0").replace('/', "~1"));
        acc
    })
}

/// Final path component, splitting on both `/` and `\`.
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

enum Pending<'a> {
    Node {
        map: &'a Map<String, Value>,
        location: FieldPath,
    },
    Found(Reference<'a>),
}

/// Iterator over every reference under the reserved key.
pub struct ReferenceWalker<'a> {
    reserved_key: &'a str,
    stack: Vec<Pending<'a>>,
}

impl<'a> ReferenceWalker<'a> {
    pub fn new(document: &'a Value, reserved_key: &'a str) -> Self {
        let mut walker = ReferenceWalker {
            reserved_key,
            stack: Vec::new(),
        };
        let mut roots = Vec::new();
        match document {
            Value::Object(map) => roots.push(Pending::Node {
                map,
                location: Vec::new(),
            }),
            Value::Array(items) => push_map_elements(&mut roots, items, &[]),
            _ => {}
        }
        walker.stack.extend(roots.into_iter().rev());
        walker
    }

    fn expand(&mut self, map: &'a Map<String, Value>, location: FieldPath) {
        let mut children = Vec::new();
        for (key, value) in map {
            let mut child_location = location.clone();
            child_location.push(key.clone());

            if key == self.reserved_key {
                match value {
                    Value::String(stored) => children.push(Pending::Found(Reference {
                        location: child_location,
                        stored,
                    })),
                    Value::Array(items) => {
                        for (i, item) in items.iter().enumerate() {
                            if let Value::String(stored) = item {
                                let mut item_location = child_location.clone();
                                item_location.push(i.to_string());
                                children.push(Pending::Found(Reference {
                                    location: item_location,
                                    stored,
                                }));
                            }
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match value {
                Value::Object(inner) => children.push(Pending::Node {
                    map: inner,
                    location: child_location,
                }),
                Value::Array(items) => push_map_elements(&mut children, items, &child_location),
                _ => {}
            }
        }
        self.stack.extend(children.into_iter().rev());
    }
}

fn push_map_elements<'a>(out: &mut Vec<Pending<'a>>, items: &'a [Value], location: &[String]) {
    for (i, item) in items.iter().enumerate() {
        if let Value::Object(map) = item {
            let mut item_location = location.to_vec();
            item_location.push(i.to_string());
            out.push(Pending::Node {
                map,
                location: item_location,
            });
        }
    }
}

impl<'a> Iterator for ReferenceWalker<'a> {
    type Item = Reference<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(pending) = self.stack.pop() {
            match pending {
                Pending::Found(reference) => return Some(reference),
                Pending::Node { map, location } => self.expand(map, location),
            }
        }
        None
    }
}

/// Convenience constructor for [`ReferenceWalker`].
pub fn references<'a>(document: &'a Value, reserved_key: &'a str) -> ReferenceWalker<'a> {
    ReferenceWalker::new(document, reserved_key)
}
