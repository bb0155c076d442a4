//! Layer assignment.
//!
//! A layering operator writes `layer` on every node of the dag such that each link points from
//! a lower to a strictly higher layer. Operators do not validate their own output; the
//! pipeline does.

use crate::dag::Dag;
use crate::error::{LayoutError, Result};
use crate::util::Call;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

mod coffman_graham;
mod longest_path;
pub mod simplex;
mod topological;

pub use coffman_graham::CoffmanGraham;
pub use longest_path::LongestPath;
pub use simplex::Simplex;
pub use topological::Topological;

pub trait LayeringOperator<T>: Send + Sync {
    fn layer(&self, dag: &mut Dag<T>);
}

impl<T, F> LayeringOperator<T> for F
where
    F: Fn(&mut Dag<T>) + Send + Sync,
{
    fn layer(&self, dag: &mut Dag<T>) {
        self(dag)
    }
}

/// The layering stage of a [`Sugiyama`](crate::Sugiyama) pipeline.
pub enum Layering<T> {
    Topological(Topological),
    LongestPath(LongestPath),
    CoffmanGraham(CoffmanGraham),
    Simplex(Simplex),
    Custom(Arc<dyn LayeringOperator<T>>),
}

impl<T> Layering<T> {
    pub fn custom(op: impl LayeringOperator<T> + 'static) -> Self {
        Self::Custom(Arc::new(op))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Topological(_) => "topological",
            Self::LongestPath(_) => "longest-path",
            Self::CoffmanGraham(_) => "coffman-graham",
            Self::Simplex(_) => "simplex",
            Self::Custom(_) => "custom",
        }
    }
}

impl<T> LayeringOperator<T> for Layering<T> {
    fn layer(&self, dag: &mut Dag<T>) {
        match self {
            Self::Topological(op) => op.layer(dag),
            Self::LongestPath(op) => op.layer(dag),
            Self::CoffmanGraham(op) => op.layer(dag),
            Self::Simplex(op) => op.layer(dag),
            Self::Custom(op) => op.layer(dag),
        }
    }
}

impl<T> Default for Layering<T> {
    fn default() -> Self {
        Self::Simplex(Simplex::default())
    }
}

impl<T> Clone for Layering<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Topological(op) => Self::Topological(*op),
            Self::LongestPath(op) => Self::LongestPath(*op),
            Self::CoffmanGraham(op) => Self::CoffmanGraham(*op),
            Self::Simplex(op) => Self::Simplex(*op),
            Self::Custom(op) => Self::Custom(Arc::clone(op)),
        }
    }
}

impl<T> fmt::Debug for Layering<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topological(op) => fmt::Debug::fmt(op, f),
            Self::LongestPath(op) => fmt::Debug::fmt(op, f),
            Self::CoffmanGraham(op) => fmt::Debug::fmt(op, f),
            Self::Simplex(op) => fmt::Debug::fmt(op, f),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl<T> From<Topological> for Layering<T> {
    fn from(op: Topological) -> Self {
        Self::Topological(op)
    }
}

impl<T> From<LongestPath> for Layering<T> {
    fn from(op: LongestPath) -> Self {
        Self::LongestPath(op)
    }
}

impl<T> From<CoffmanGraham> for Layering<T> {
    fn from(op: CoffmanGraham) -> Self {
        Self::CoffmanGraham(op)
    }
}

impl<T> From<Simplex> for Layering<T> {
    fn from(op: Simplex) -> Self {
        Self::Simplex(op)
    }
}

impl<T> FromStr for Layering<T> {
    type Err = LayoutError;

    /// Accepts `topological`, `simplex`, `longest-path([top-down|bottom-up])` and
    /// `coffman-graham([width])`.
    fn from_str(s: &str) -> Result<Self> {
        let call = Call::parse(s)?;
        match call.name {
            "topological" => {
                call.no_args("topological")?;
                Ok(Self::Topological(Topological))
            }
            "simplex" => {
                call.no_args("simplex")?;
                Ok(Self::Simplex(Simplex::default()))
            }
            "longest-path" | "longestPath" => {
                call.at_most("longest-path", 1)?;
                let top_down = match call.args.first().copied() {
                    None | Some("top-down") | Some("true") => true,
                    Some("bottom-up") | Some("false") => false,
                    Some(other) => return Err(crate::util::invalid("longest-path", other)),
                };
                Ok(Self::LongestPath(LongestPath::default().with_top_down(top_down)))
            }
            "coffman-graham" | "coffmanGraham" => {
                call.at_most("coffman-graham", 1)?;
                let width = call.arg::<usize>("coffman-graham", 0)?.unwrap_or(0);
                Ok(Self::CoffmanGraham(CoffmanGraham::default().with_width(width)))
            }
            other => Err(LayoutError::UnknownOperator {
                stage: "layering",
                name: other.to_string(),
            }),
        }
    }
}
