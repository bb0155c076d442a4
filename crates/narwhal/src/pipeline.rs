//! The layered layout pipeline.
//!
//! [`Sugiyama`] validates node sizes, runs layering, checks the layers, splits long links
//! into dummy chains, runs decrossing (checking it only reordered each layer) and coordinate
//! assignment, checks the coordinates, derives `y` from layer heights, rescales, and finally
//! folds dummies back into link waypoints.

use crate::coord::{Coord, CoordOperator};
use crate::dag::{Dag, Node};
use crate::decross::{Decross, DecrossOperator, cross_count};
use crate::error::{LayoutError, Result};
use crate::layering::{Layering, LayeringOperator};
use crate::model::{LayerGraph, Layers};
use crate::normalize;
use crate::options::LayoutOptions;
use crate::util::Call;
use rustc_hash::FxHashSet as HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub type NodeSize<T> = Arc<dyn Fn(&Node<T>) -> (f64, f64) + Send + Sync>;

/// Result of a layout: the laid out dag and the extent of the drawing.
#[derive(Debug)]
pub struct Layout<'a, T> {
    pub dag: &'a Dag<T>,
    pub width: f64,
    pub height: f64,
}

/// Layered layout of a [`Dag`].
///
/// An immutable configuration value: `with_*` setters return a modified copy and one value can
/// lay out any number of graphs.
///
/// ```
/// use narwhal::dag::Dag;
/// use narwhal::{Coord, Sugiyama};
///
/// let mut dag: Dag<()> = Dag::from_links([("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")])?;
/// let layout = Sugiyama::new()
///     .with_coord(Coord::Center(Default::default()))
///     .layout(&mut dag)?;
/// assert_eq!(layout.height, 3.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Sugiyama<T> {
    layering: Layering<T>,
    decross: Decross,
    coord: Coord,
    node_size: NodeSize<T>,
    dummy_size: (f64, f64),
    size: Option<(f64, f64)>,
    debug: bool,
}

impl<T> Default for Sugiyama<T> {
    fn default() -> Self {
        Self {
            layering: Layering::default(),
            decross: Decross::default(),
            coord: Coord::default(),
            node_size: Arc::new(|_: &Node<T>| (1.0, 1.0)),
            dummy_size: (0.0, 0.0),
            size: None,
            debug: false,
        }
    }
}

impl<T> Clone for Sugiyama<T> {
    fn clone(&self) -> Self {
        Self {
            layering: self.layering.clone(),
            decross: self.decross.clone(),
            coord: self.coord.clone(),
            node_size: Arc::clone(&self.node_size),
            dummy_size: self.dummy_size,
            size: self.size,
            debug: self.debug,
        }
    }
}

impl<T> fmt::Debug for Sugiyama<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sugiyama")
            .field("layering", &self.layering)
            .field("decross", &self.decross)
            .field("coord", &self.coord)
            .field("dummy_size", &self.dummy_size)
            .field("size", &self.size)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl<T> Sugiyama<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pipeline from serializable options.
    pub fn from_options(options: &LayoutOptions) -> Result<Self> {
        let mut sugiyama = Self::new()
            .with_layering(options.layering.parse::<Layering<T>>()?)
            .with_decross(options.decross.parse::<Decross>()?)
            .with_coord(options.coord.parse::<Coord>()?)
            .with_size(options.size.map(|[w, h]| (w, h)))
            .with_debug(options.debug);
        if let Some([w, h]) = options.dummy_size {
            sugiyama = sugiyama.with_dummy_size((w, h));
        }
        Ok(sugiyama)
    }

    pub fn layering(&self) -> &Layering<T> {
        &self.layering
    }

    pub fn decross(&self) -> &Decross {
        &self.decross
    }

    pub fn coord(&self) -> &Coord {
        &self.coord
    }

    pub fn node_size(&self) -> &NodeSize<T> {
        &self.node_size
    }

    pub fn dummy_size(&self) -> (f64, f64) {
        self.dummy_size
    }

    pub fn size(&self) -> Option<(f64, f64)> {
        self.size
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn with_layering(self, layering: impl Into<Layering<T>>) -> Self {
        Self {
            layering: layering.into(),
            ..self
        }
    }

    pub fn with_decross(self, decross: impl Into<Decross>) -> Self {
        Self {
            decross: decross.into(),
            ..self
        }
    }

    pub fn with_coord(self, coord: impl Into<Coord>) -> Self {
        Self {
            coord: coord.into(),
            ..self
        }
    }

    /// Sets the `(width, height)` of every real node.
    pub fn with_node_size<F>(self, node_size: F) -> Self
    where
        F: Fn(&Node<T>) -> (f64, f64) + Send + Sync + 'static,
    {
        Self {
            node_size: Arc::new(node_size),
            ..self
        }
    }

    /// Sets the `(width, height)` of the dummy nodes that carry long links.
    pub fn with_dummy_size(self, dummy_size: (f64, f64)) -> Self {
        Self { dummy_size, ..self }
    }

    /// Rescales the result to a fixed `(width, height)`; `None` keeps the natural size.
    pub fn with_size(self, size: impl Into<Option<(f64, f64)>>) -> Self {
        Self {
            size: size.into(),
            ..self
        }
    }

    /// Enables per-stage `tracing` events (layer and dummy counts, crossings, width).
    pub fn with_debug(self, debug: bool) -> Self {
        Self { debug, ..self }
    }

    pub fn layout<'a>(&self, dag: &'a mut Dag<T>) -> Result<Layout<'a, T>> {
        let _span = tracing::debug_span!(
            "sugiyama",
            nodes = dag.len(),
            links = dag.link_count(),
            layering = self.layering.name(),
            decross = self.decross.name(),
            coord = self.coord.name(),
        )
        .entered();

        let sizes = self.node_sizes(dag)?;

        dag.clear_layout();
        self.layering.layer(dag);
        validate_layers(dag)?;

        let mut graph = normalize::run(dag, &sizes, self.dummy_size);
        if self.debug {
            tracing::debug!(
                layers = graph.layer_count(),
                dummies = graph.dummy_count(),
                "layered"
            );
        }

        let heights = layer_heights(&graph);
        let height: f64 = heights.iter().sum();
        if height <= 0.0 {
            return Err(LayoutError::ZeroHeight);
        }

        let mut layers = graph.layers();
        self.decross.decross(&graph, &mut layers);
        verify_membership(&graph, &layers)?;
        if self.debug {
            tracing::debug!(crossings = cross_count(&graph, &layers), "decrossed");
        }

        let width = self.coord.coord(&mut graph, &layers);
        validate_coords(&graph, width)?;
        if self.debug {
            tracing::debug!(width, height, "assigned coordinates");
        }

        assign_y(&mut graph, &heights);
        let (width, height) = match self.size {
            Some(size) => {
                rescale(&mut graph, (width, height), size);
                size
            }
            None => (width, height),
        };

        normalize::undo(&graph, dag);
        Ok(Layout { dag, width, height })
    }

    fn node_sizes(&self, dag: &Dag<T>) -> Result<Vec<(f64, f64)>> {
        let mut sizes: Vec<(f64, f64)> = Vec::with_capacity(dag.len());
        for node in dag.nodes() {
            let (width, height) = (self.node_size)(node);
            // Also rejects NaN.
            if !(width >= 0.0 && height >= 0.0) {
                return Err(LayoutError::NegativeSize {
                    id: node.id().to_string(),
                    width,
                    height,
                });
            }
            sizes.push((width, height));
        }
        Ok(sizes)
    }
}

impl<T> FromStr for Sugiyama<T> {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        let call = Call::parse(s)?;
        match call.name {
            "sugiyama" => {
                call.no_args("sugiyama")?;
                Ok(Self::new())
            }
            other => Err(LayoutError::UnknownOperator {
                stage: "pipeline",
                name: other.to_string(),
            }),
        }
    }
}

fn validate_layers<T>(dag: &Dag<T>) -> Result<()> {
    for node in dag.nodes() {
        match node.layer {
            None => {
                return Err(LayoutError::MissingLayer {
                    id: node.id().to_string(),
                });
            }
            Some(layer) if layer < 0 => {
                return Err(LayoutError::NegativeLayer {
                    id: node.id().to_string(),
                    layer,
                });
            }
            Some(_) => {}
        }
    }

    for (_, link) in dag.links() {
        let parent = &dag[link.source()];
        let child = &dag[link.target()];
        let (Some(parent_layer), Some(child_layer)) = (parent.layer, child.layer) else {
            continue;
        };
        if child_layer <= parent_layer {
            return Err(LayoutError::NonIncreasingLayer {
                parent: parent.id().to_string(),
                parent_layer,
                child: child.id().to_string(),
                child_layer,
            });
        }
    }
    Ok(())
}

fn verify_membership(graph: &LayerGraph, layers: &Layers) -> Result<()> {
    let expected = graph.layers();
    for i in 0..expected.len().max(layers.len()) {
        let want: HashSet<usize> = expected.get(i).into_iter().flatten().copied().collect();
        let got = layers.get(i).map(Vec::as_slice).unwrap_or(&[]);
        let got_set: HashSet<usize> = got.iter().copied().collect();
        // Equal sets of equal length also rule out duplicates.
        if got.len() != want.len() || got_set != want {
            return Err(LayoutError::DecrossMembership { layer: i });
        }
    }
    Ok(())
}

fn validate_coords(graph: &LayerGraph, width: f64) -> Result<()> {
    for node in graph.nodes() {
        let Some(x) = node.x else {
            return Err(LayoutError::MissingX {
                id: node.id.clone(),
            });
        };
        if !(0.0..=width).contains(&x) {
            return Err(LayoutError::XOutOfBounds {
                id: node.id.clone(),
                x,
                width,
            });
        }
    }
    Ok(())
}

/// Tallest node of each layer.
fn layer_heights(graph: &LayerGraph) -> Vec<f64> {
    let mut heights = vec![0.0f64; graph.layer_count()];
    for node in graph.nodes() {
        heights[node.layer] = heights[node.layer].max(node.height);
    }
    heights
}

/// Centres every node vertically in its layer band.
fn assign_y(graph: &mut LayerGraph, heights: &[f64]) {
    let mut middles: Vec<f64> = Vec::with_capacity(heights.len());
    let mut top = 0.0;
    for &h in heights {
        middles.push(top + h / 2.0);
        top += h;
    }
    for node in graph.nodes_mut() {
        node.y = Some(middles[node.layer]);
    }
}

fn rescale(graph: &mut LayerGraph, (width, height): (f64, f64), (out_w, out_h): (f64, f64)) {
    for node in graph.nodes_mut() {
        node.x = node.x.map(|x| {
            if width > 0.0 {
                x * out_w / width
            } else {
                out_w / 2.0
            }
        });
        node.y = node.y.map(|y| y * out_h / height);
    }
}
