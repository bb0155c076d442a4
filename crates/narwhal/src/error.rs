//! Layout errors.
//!
//! Every variant keeps the offending values as fields; the rendered text is relied upon by
//! callers that match on messages, so it must stay stable.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("got arguments to {factory}")]
    UnexpectedArguments { factory: String },
    #[error("unknown {stage} operator '{name}'")]
    UnknownOperator { stage: &'static str, name: String },
    #[error("invalid argument '{argument}' to {factory}")]
    InvalidArgument { factory: String, argument: String },

    #[error(
        "all node sizes must be non-negative, but got width {width} and height {height} for node id: {id}"
    )]
    NegativeSize { id: String, width: f64, height: f64 },
    #[error("at least one node must have positive height, but total height was zero")]
    ZeroHeight,

    #[error("layering did not assign layer to node '{id}'")]
    MissingLayer { id: String },
    #[error("layering assigned a negative layer ({layer}) to node '{id}'")]
    NegativeLayer { id: String, layer: i32 },
    #[error(
        "layering left child node '{child}' ({child_layer}) with a layer not greater than its parent node '{parent}' ({parent_layer})"
    )]
    NonIncreasingLayer {
        parent: String,
        parent_layer: i32,
        child: String,
        child_layer: i32,
    },

    #[error("decross changed the nodes of layer {layer}")]
    DecrossMembership { layer: usize },

    #[error("coord didn't assign an x to node '{id}'")]
    MissingX { id: String },
    #[error("coord assgined an x ({x}) outside of [0, {width}]")]
    XOutOfBounds { id: String, x: f64, width: f64 },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
