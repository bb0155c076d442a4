//! The [`Dag`] arena and its node/link records.

use crate::error::{DagError, Result};
use rustc_hash::FxBuildHasher;
use std::ops::{Index, IndexMut};

pub mod alg;
mod order;

pub use order::IterOrder;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

/// Handle of a node inside the [`Dag`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle of a link inside the [`Dag`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(usize);

impl LinkId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A node record: a stable id, the caller payload, and the layout attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    id: String,
    pub data: T,
    pub layer: Option<i32>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl<T> Node<T> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn clear_layout(&mut self) {
        self.layer = None;
        self.x = None;
        self.y = None;
    }
}

/// A parent → child relation. `points` holds the drawn path once a layout ran.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    source: NodeId,
    target: NodeId,
    pub points: Vec<Point>,
}

impl Link {
    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }
}

#[derive(Debug, Clone)]
struct NodeEntry<T> {
    node: Node<T>,
    child_links: Vec<LinkId>,
    parent_links: Vec<LinkId>,
}

#[derive(Debug, Clone)]
pub struct Dag<T> {
    nodes: Vec<NodeEntry<T>>,
    links: Vec<Link>,
    node_index: HashMap<String, NodeId>,
    link_index: HashSet<(NodeId, NodeId)>,
}

impl<T> Default for Dag<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Dag<T> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            node_index: HashMap::default(),
            link_index: HashSet::default(),
        }
    }

    /// Builds a dag from `(id, payload, parent ids)` rows, the way tabular data usually
    /// describes hierarchies. All rows are added before any link so parents may appear after
    /// their children.
    pub fn stratify<I, S, P>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T, Vec<P>)>,
        S: Into<String>,
        P: AsRef<str>,
    {
        let mut dag = Self::new();
        let mut pending: Vec<(NodeId, Vec<P>)> = Vec::new();
        for (id, data, parents) in rows {
            let v = dag.add_node(id, data)?;
            pending.push((v, parents));
        }
        for (child, parents) in pending {
            for parent in parents {
                let parent = dag.require(parent.as_ref())?;
                dag.add_link(parent, child)?;
            }
        }
        Ok(dag)
    }

    pub fn add_node(&mut self, id: impl Into<String>, data: T) -> Result<NodeId> {
        let id = id.into();
        if self.node_index.contains_key(id.as_str()) {
            return Err(DagError::DuplicateNode { id });
        }
        let v = NodeId(self.nodes.len());
        self.node_index.insert(id.clone(), v);
        self.nodes.push(NodeEntry {
            node: Node {
                id,
                data,
                layer: None,
                x: None,
                y: None,
            },
            child_links: Vec::new(),
            parent_links: Vec::new(),
        });
        Ok(v)
    }

    pub fn add_link(&mut self, parent: NodeId, child: NodeId) -> Result<LinkId> {
        for v in [parent, child] {
            if v.0 >= self.nodes.len() {
                return Err(DagError::UnknownNode {
                    id: format!("#{}", v.0),
                });
            }
        }
        if parent == child {
            return Err(DagError::SelfLoop {
                id: self.nodes[parent.0].node.id.clone(),
            });
        }
        if !self.link_index.insert((parent, child)) {
            return Err(DagError::DuplicateLink {
                parent: self.nodes[parent.0].node.id.clone(),
                child: self.nodes[child.0].node.id.clone(),
            });
        }

        let e = LinkId(self.links.len());
        self.links.push(Link {
            source: parent,
            target: child,
            points: Vec::new(),
        });
        self.nodes[parent.0].child_links.push(e);
        self.nodes[child.0].parent_links.push(e);
        Ok(e)
    }

    /// Links two nodes by their string ids.
    pub fn connect(&mut self, parent: &str, child: &str) -> Result<LinkId> {
        let parent = self.require(parent)?;
        let child = self.require(child)?;
        self.add_link(parent, child)
    }

    fn require(&self, id: &str) -> Result<NodeId> {
        self.node_id(id)
            .ok_or_else(|| DagError::UnknownNode { id: id.to_string() })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.node_index.get(id).copied()
    }

    pub fn node(&self, v: NodeId) -> &Node<T> {
        &self.nodes[v.0].node
    }

    pub fn node_mut(&mut self, v: NodeId) -> &mut Node<T> {
        &mut self.nodes[v.0].node
    }

    pub fn find(&self, id: &str) -> Option<&Node<T>> {
        self.node_id(id).map(|v| self.node(v))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node<T>> {
        self.node_id(id).map(move |v| self.node_mut(v))
    }

    pub fn node_ids(&self) -> impl ExactSizeIterator<Item = NodeId> + use<T> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node<T>> {
        self.nodes.iter().map(|e| &e.node)
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node<T>> {
        self.nodes.iter_mut().map(|e| &mut e.node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<T>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(ix, e)| (NodeId(ix), &e.node))
    }

    pub fn link(&self, e: LinkId) -> &Link {
        &self.links[e.0]
    }

    pub fn link_mut(&mut self, e: LinkId) -> &mut Link {
        &mut self.links[e.0]
    }

    pub fn links(&self) -> impl Iterator<Item = (LinkId, &Link)> {
        self.links
            .iter()
            .enumerate()
            .map(|(ix, link)| (LinkId(ix), link))
    }

    pub fn links_mut(&mut self) -> impl Iterator<Item = &mut Link> {
        self.links.iter_mut()
    }

    /// Finds the link between two nodes, if any.
    pub fn link_between(&self, parent: NodeId, child: NodeId) -> Option<LinkId> {
        self.nodes
            .get(parent.0)?
            .child_links
            .iter()
            .copied()
            .find(|&e| self.links[e.0].target == child)
    }

    pub fn child_links(&self, v: NodeId) -> &[LinkId] {
        &self.nodes[v.0].child_links
    }

    pub fn parent_links(&self, v: NodeId) -> &[LinkId] {
        &self.nodes[v.0].parent_links
    }

    /// Children of `v` in link insertion order.
    pub fn children(&self, v: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[v.0]
            .child_links
            .iter()
            .map(|&e| self.links[e.0].target)
    }

    /// Parents of `v` in link insertion order.
    pub fn parents(&self, v: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[v.0]
            .parent_links
            .iter()
            .map(|&e| self.links[e.0].source)
    }

    pub fn roots(&self) -> Vec<NodeId> {
        self.node_ids()
            .filter(|&v| self.nodes[v.0].parent_links.is_empty())
            .collect()
    }

    pub fn leaves(&self) -> Vec<NodeId> {
        self.node_ids()
            .filter(|&v| self.nodes[v.0].child_links.is_empty())
            .collect()
    }

    /// Forgets every layout attribute (layers, coordinates and link points).
    pub fn clear_layout(&mut self) {
        for node in self.nodes_mut() {
            node.clear_layout();
        }
        for link in self.links_mut() {
            link.points.clear();
        }
    }
}

impl<T: Default> Dag<T> {
    /// Builds a dag from `(parent, child)` id pairs, creating nodes with a default payload the
    /// first time an id is seen.
    pub fn from_links<I, S>(links: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut dag = Self::new();
        for (parent, child) in links {
            let parent = dag.ensure_node(parent.as_ref());
            let child = dag.ensure_node(child.as_ref());
            dag.add_link(parent, child)?;
        }
        Ok(dag)
    }

    pub fn ensure_node(&mut self, id: &str) -> NodeId {
        if let Some(v) = self.node_id(id) {
            return v;
        }
        let v = NodeId(self.nodes.len());
        self.node_index.insert(id.to_string(), v);
        self.nodes.push(NodeEntry {
            node: Node {
                id: id.to_string(),
                data: T::default(),
                layer: None,
                x: None,
                y: None,
            },
            child_links: Vec::new(),
            parent_links: Vec::new(),
        });
        v
    }
}

impl<T> Index<NodeId> for Dag<T> {
    type Output = Node<T>;

    fn index(&self, v: NodeId) -> &Node<T> {
        self.node(v)
    }
}

impl<T> IndexMut<NodeId> for Dag<T> {
    fn index_mut(&mut self, v: NodeId) -> &mut Node<T> {
        self.node_mut(v)
    }
}
