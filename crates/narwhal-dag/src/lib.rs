//! DAG container used by `narwhal`.
//!
//! Nodes and links live in arenas and are addressed by copyable handles ([`NodeId`],
//! [`LinkId`]). Every node carries a caller-supplied payload plus the attributes a layered
//! layout writes back (`layer`, `x`, `y`); every link carries the waypoints of its drawn path.

mod dag;
pub mod error;

pub use dag::{Dag, IterOrder, Link, LinkId, Node, NodeId, Point, alg};
pub use error::{DagError, Result};
