//! Horizontal coordinate assignment.
//!
//! A coord operator sets `x` on every node of the [`LayerGraph`] and returns the drawing width
//! `W`. Nodes of one layer must keep their order and stay at least half their summed widths
//! apart; every `x` must end up in `[0, W]`.

use crate::error::{LayoutError, Result};
use crate::model::{LayerGraph, Layers};
use crate::util::Call;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

mod center;
mod greedy;
mod min_curve;
mod topological;
mod vert;

pub use center::Center;
pub use greedy::Greedy;
pub use min_curve::MinCurve;
pub use topological::Topological;
pub use vert::Vert;

pub trait CoordOperator: Send + Sync {
    fn coord(&self, graph: &mut LayerGraph, layers: &Layers) -> f64;
}

impl<F> CoordOperator for F
where
    F: Fn(&mut LayerGraph, &Layers) -> f64 + Send + Sync,
{
    fn coord(&self, graph: &mut LayerGraph, layers: &Layers) -> f64 {
        self(graph, layers)
    }
}

#[derive(Clone)]
pub enum Coord {
    Center(Center),
    Vert(Vert),
    MinCurve(MinCurve),
    Greedy(Greedy),
    Topological(Topological),
    Custom(Arc<dyn CoordOperator>),
}

impl Coord {
    pub fn custom(op: impl CoordOperator + 'static) -> Self {
        Self::Custom(Arc::new(op))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Center(_) => "center",
            Self::Vert(_) => "vert",
            Self::MinCurve(_) => "min-curve",
            Self::Greedy(_) => "greedy",
            Self::Topological(_) => "topological",
            Self::Custom(_) => "custom",
        }
    }
}

impl CoordOperator for Coord {
    fn coord(&self, graph: &mut LayerGraph, layers: &Layers) -> f64 {
        match self {
            Self::Center(op) => op.coord(graph, layers),
            Self::Vert(op) => op.coord(graph, layers),
            Self::MinCurve(op) => op.coord(graph, layers),
            Self::Greedy(op) => op.coord(graph, layers),
            Self::Topological(op) => op.coord(graph, layers),
            Self::Custom(op) => op.coord(graph, layers),
        }
    }
}

impl Default for Coord {
    fn default() -> Self {
        Self::Vert(Vert::default())
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Center(op) => fmt::Debug::fmt(op, f),
            Self::Vert(op) => fmt::Debug::fmt(op, f),
            Self::MinCurve(op) => fmt::Debug::fmt(op, f),
            Self::Greedy(op) => fmt::Debug::fmt(op, f),
            Self::Topological(op) => fmt::Debug::fmt(op, f),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<Center> for Coord {
    fn from(op: Center) -> Self {
        Self::Center(op)
    }
}

impl From<Vert> for Coord {
    fn from(op: Vert) -> Self {
        Self::Vert(op)
    }
}

impl From<MinCurve> for Coord {
    fn from(op: MinCurve) -> Self {
        Self::MinCurve(op)
    }
}

impl From<Greedy> for Coord {
    fn from(op: Greedy) -> Self {
        Self::Greedy(op)
    }
}

impl From<Topological> for Coord {
    fn from(op: Topological) -> Self {
        Self::Topological(op)
    }
}

impl FromStr for Coord {
    type Err = LayoutError;

    /// Accepts `center`, `greedy`, `topological`, `vert([passes])` and `min-curve([weight])`.
    fn from_str(s: &str) -> Result<Self> {
        let call = Call::parse(s)?;
        match call.name {
            "center" => {
                call.no_args("center")?;
                Ok(Self::Center(Center))
            }
            "greedy" => {
                call.no_args("greedy")?;
                Ok(Self::Greedy(Greedy))
            }
            "topological" => {
                call.no_args("topological")?;
                Ok(Self::Topological(Topological))
            }
            "vert" => {
                call.at_most("vert", 1)?;
                let mut op = Vert::default();
                if let Some(passes) = call.arg::<usize>("vert", 0)? {
                    op = op.with_passes(passes);
                }
                Ok(Self::Vert(op))
            }
            "min-curve" | "minCurve" => {
                call.at_most("min-curve", 1)?;
                let mut op = MinCurve::default();
                if let Some(weight) = call.arg::<f64>("min-curve", 0)? {
                    op = op.with_weight(weight)?;
                }
                Ok(Self::MinCurve(op))
            }
            other => Err(LayoutError::UnknownOperator {
                stage: "coord",
                name: other.to_string(),
            }),
        }
    }
}

/// Minimum distance between the centres of two neighbouring nodes.
pub(crate) fn separation(graph: &LayerGraph, a: usize, b: usize) -> f64 {
    (graph.width(a) + graph.width(b)) / 2.0
}

/// `gaps[i]` is the separation between `layer[i]` and `layer[i + 1]`.
pub(crate) fn gaps(graph: &LayerGraph, layer: &[usize]) -> Vec<f64> {
    layer
        .windows(2)
        .map(|pair| separation(graph, pair[0], pair[1]))
        .collect()
}

/// Places a layer as tightly as possible with its left edge at 0.
pub(crate) fn pack_left(graph: &LayerGraph, layer: &[usize]) -> Vec<f64> {
    let mut xs: Vec<f64> = Vec::with_capacity(layer.len());
    for (i, &v) in layer.iter().enumerate() {
        let x = match i {
            0 => graph.width(v) / 2.0,
            _ => xs[i - 1] + separation(graph, layer[i - 1], v),
        };
        xs.push(x);
    }
    xs
}

/// Weighted projection onto the ordering constraints of one layer.
///
/// Solves `min sum w_i (x_i - t_i)^2` subject to `x_{i+1} - x_i >= gaps[i]` exactly, by
/// subtracting the cumulative gaps and running weighted pool-adjacent-violators on the
/// remaining isotonic regression. Weights must be positive.
pub(crate) fn project(targets: &[f64], weights: &[f64], gaps: &[f64]) -> Vec<f64> {
    let n = targets.len();
    let mut offsets: Vec<f64> = Vec::with_capacity(n);
    let mut acc = 0.0;
    for i in 0..n {
        if i > 0 {
            acc += gaps[i - 1];
        }
        offsets.push(acc);
    }

    // (weight sum, weighted target sum, count)
    let mut blocks: Vec<(f64, f64, usize)> = Vec::with_capacity(n);
    for i in 0..n {
        let w = weights[i];
        blocks.push((w, w * (targets[i] - offsets[i]), 1));
        while blocks.len() >= 2 {
            let (w1, s1, c1) = blocks[blocks.len() - 1];
            let (w0, s0, c0) = blocks[blocks.len() - 2];
            if s0 / w0 <= s1 / w1 {
                break;
            }
            blocks.pop();
            blocks.pop();
            blocks.push((w0 + w1, s0 + s1, c0 + c1));
        }
    }

    let mut xs: Vec<f64> = Vec::with_capacity(n);
    for (w, s, count) in blocks {
        let level = s / w;
        for _ in 0..count {
            let i = xs.len();
            xs.push(level + offsets[i]);
        }
    }
    xs
}

/// Writes `xs` (per layer, in layer order) into the graph.
pub(crate) fn apply(graph: &mut LayerGraph, layers: &Layers, xs: &[Vec<f64>]) {
    for (layer, row) in layers.iter().zip(xs) {
        for (&v, &x) in layer.iter().zip(row) {
            graph.set_x(v, x);
        }
    }
}

/// Shifts every placed node so the leftmost edge sits at 0 and returns the rightmost edge.
pub(crate) fn finish(graph: &mut LayerGraph, layers: &Layers) -> f64 {
    let mut left = f64::INFINITY;
    let mut right = f64::NEG_INFINITY;
    for &v in layers.iter().flatten() {
        let Some(x) = graph.x(v) else {
            continue;
        };
        let half = graph.width(v) / 2.0;
        left = left.min(x - half);
        right = right.max(x + half);
    }
    if !left.is_finite() {
        return 0.0;
    }
    for &v in layers.iter().flatten() {
        if let Some(x) = graph.x(v) {
            graph.set_x(v, x - left);
        }
    }
    right - left
}
