//! Crossing reduction within layers.
//!
//! A decross operator permutes each layer of a [`Layers`] in place. It must not move nodes
//! between layers; the pipeline checks this when running in debug mode.

use crate::error::{LayoutError, Result};
use crate::model::{LayerGraph, Layers};
use crate::util::{Call, invalid};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

mod cross_count;
mod opt;
mod two_layer;

pub use cross_count::cross_count;
pub use opt::Opt;
pub use two_layer::{TwoLayer, TwoLayerOrder};

pub trait DecrossOperator: Send + Sync {
    fn decross(&self, graph: &LayerGraph, layers: &mut Layers);
}

impl<F> DecrossOperator for F
where
    F: Fn(&LayerGraph, &mut Layers) + Send + Sync,
{
    fn decross(&self, graph: &LayerGraph, layers: &mut Layers) {
        self(graph, layers)
    }
}

#[derive(Clone)]
pub enum Decross {
    TwoLayer(TwoLayer),
    Opt(Opt),
    Custom(Arc<dyn DecrossOperator>),
}

impl Decross {
    pub fn custom(op: impl DecrossOperator + 'static) -> Self {
        Self::Custom(Arc::new(op))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TwoLayer(_) => "two-layer",
            Self::Opt(_) => "opt",
            Self::Custom(_) => "custom",
        }
    }
}

impl DecrossOperator for Decross {
    fn decross(&self, graph: &LayerGraph, layers: &mut Layers) {
        match self {
            Self::TwoLayer(op) => op.decross(graph, layers),
            Self::Opt(op) => op.decross(graph, layers),
            Self::Custom(op) => op.decross(graph, layers),
        }
    }
}

impl Default for Decross {
    fn default() -> Self {
        Self::TwoLayer(TwoLayer::default())
    }
}

impl fmt::Debug for Decross {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TwoLayer(op) => fmt::Debug::fmt(op, f),
            Self::Opt(op) => fmt::Debug::fmt(op, f),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<TwoLayer> for Decross {
    fn from(op: TwoLayer) -> Self {
        Self::TwoLayer(op)
    }
}

impl From<Opt> for Decross {
    fn from(op: Opt) -> Self {
        Self::Opt(op)
    }
}

impl FromStr for Decross {
    type Err = LayoutError;

    /// Accepts `two-layer([median|mean][, passes])` and `opt([max_steps])`.
    fn from_str(s: &str) -> Result<Self> {
        let call = Call::parse(s)?;
        match call.name {
            "two-layer" | "twoLayer" => {
                call.at_most("two-layer", 2)?;
                let order = match call.args.first().copied() {
                    None | Some("median") => TwoLayerOrder::Median,
                    Some("mean") => TwoLayerOrder::Mean,
                    Some(other) => return Err(invalid("two-layer", other)),
                };
                let mut op = TwoLayer::default().with_order(order);
                if let Some(passes) = call.arg::<usize>("two-layer", 1)? {
                    op = op.with_passes(passes);
                }
                Ok(Self::TwoLayer(op))
            }
            "opt" => {
                call.at_most("opt", 1)?;
                let mut op = Opt::default();
                if let Some(max_steps) = call.arg::<usize>("opt", 0)? {
                    op = op.with_max_steps(max_steps);
                }
                Ok(Self::Opt(op))
            }
            other => Err(LayoutError::UnknownOperator {
                stage: "decross",
                name: other.to_string(),
            }),
        }
    }
}
