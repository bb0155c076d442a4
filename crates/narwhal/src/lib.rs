//! Layered (Sugiyama) layout of directed acyclic graphs.
//!
//! A layout runs in three pluggable stages: [`layering`] assigns every node an integer layer,
//! [`decross`] orders the nodes inside each layer to reduce link crossings, and [`coord`] places
//! them horizontally. [`Sugiyama`] wires the stages together, inserts dummy nodes for links that
//! span several layers and turns them into link waypoints at the end.

pub use narwhal_dag as dag;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod coord;
pub mod decross;
pub mod error;
pub mod layering;
pub mod model;
pub mod normalize;
mod options;
pub mod pipeline;
mod util;

pub use coord::{Coord, CoordOperator};
pub use decross::{Decross, DecrossOperator};
pub use error::{LayoutError, Result};
pub use layering::{Layering, LayeringOperator};
pub use model::{LayerGraph, LayerNode, Layers, NodeKind};
pub use options::LayoutOptions;
pub use pipeline::{Layout, NodeSize, Sugiyama};
