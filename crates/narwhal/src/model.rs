//! The layered graph the decrossing and coordinate stages work on.
//!
//! It is a second arena next to the caller's [`Dag`](crate::dag::Dag): one entry per real node
//! followed by the dummies that split long links. Every edge of a `LayerGraph` joins two
//! adjacent layers.

use crate::dag::{LinkId, NodeId};

/// Nodes of each layer, top layer first, as indices into a [`LayerGraph`].
pub type Layers = Vec<Vec<usize>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Real(NodeId),
    /// `step` counts from 1 at the dummy right below the link's source.
    Dummy {
        link: LinkId,
        step: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerNode {
    pub id: String,
    pub kind: NodeKind,
    pub layer: usize,
    pub width: f64,
    pub height: f64,
    pub x: Option<f64>,
    pub y: Option<f64>,
    children: Vec<usize>,
    parents: Vec<usize>,
}

impl LayerNode {
    pub fn is_dummy(&self) -> bool {
        matches!(self.kind, NodeKind::Dummy { .. })
    }

    pub fn real(&self) -> Option<NodeId> {
        match self.kind {
            NodeKind::Real(v) => Some(v),
            NodeKind::Dummy { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayerGraph {
    nodes: Vec<LayerNode>,
    /// Dummy chain of each dag link, indexed by `LinkId::index`.
    chains: Vec<Vec<usize>>,
    layer_count: usize,
}

impl LayerGraph {
    pub(crate) fn with_links(link_count: usize) -> Self {
        Self {
            nodes: Vec::new(),
            chains: vec![Vec::new(); link_count],
            layer_count: 0,
        }
    }

    pub(crate) fn push_node(
        &mut self,
        id: String,
        kind: NodeKind,
        layer: usize,
        (width, height): (f64, f64),
    ) -> usize {
        let ix = self.nodes.len();
        self.nodes.push(LayerNode {
            id,
            kind,
            layer,
            width,
            height,
            x: None,
            y: None,
            children: Vec::new(),
            parents: Vec::new(),
        });
        if let NodeKind::Dummy { link, .. } = kind {
            self.chains[link.index()].push(ix);
        }
        self.layer_count = self.layer_count.max(layer + 1);
        ix
    }

    /// Renumbers layers so only occupied ones remain. Empty layers have no height, so this
    /// leaves the drawing unchanged while keeping per-layer storage bounded by the node count.
    pub(crate) fn compact_layers(&mut self) {
        let mut used: Vec<usize> = self.nodes.iter().map(|n| n.layer).collect();
        used.sort_unstable();
        used.dedup();
        if used.len() == self.layer_count {
            return;
        }
        for node in &mut self.nodes {
            node.layer = match used.binary_search(&node.layer) {
                Ok(ix) | Err(ix) => ix,
            };
        }
        self.layer_count = used.len();
    }

    pub(crate) fn connect(&mut self, parent: usize, child: usize) {
        self.nodes[parent].children.push(child);
        self.nodes[child].parents.push(parent);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    pub fn dummy_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_dummy()).count()
    }

    pub fn node(&self, ix: usize) -> &LayerNode {
        &self.nodes[ix]
    }

    pub fn nodes(&self) -> impl Iterator<Item = &LayerNode> {
        self.nodes.iter()
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut LayerNode> {
        self.nodes.iter_mut()
    }

    pub fn children(&self, ix: usize) -> &[usize] {
        &self.nodes[ix].children
    }

    pub fn parents(&self, ix: usize) -> &[usize] {
        &self.nodes[ix].parents
    }

    pub fn width(&self, ix: usize) -> f64 {
        self.nodes[ix].width
    }

    pub fn x(&self, ix: usize) -> Option<f64> {
        self.nodes[ix].x
    }

    pub fn set_x(&mut self, ix: usize, x: f64) {
        self.nodes[ix].x = Some(x);
    }

    pub fn set_y(&mut self, ix: usize, y: f64) {
        self.nodes[ix].y = Some(y);
    }

    /// Dummies standing in for `link`, from its source side down.
    pub fn chain(&self, link: LinkId) -> &[usize] {
        self.chains
            .get(link.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Groups nodes by layer; within a layer nodes keep arena order (real nodes first).
    pub fn layers(&self) -> Layers {
        let mut layers: Layers = vec![Vec::new(); self.layer_count];
        for (ix, node) in self.nodes.iter().enumerate() {
            layers[node.layer].push(ix);
        }
        layers
    }
}
