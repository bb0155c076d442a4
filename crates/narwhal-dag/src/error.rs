#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DagError {
    #[error("node id '{id}' is already present in the dag")]
    DuplicateNode { id: String },
    #[error("unknown node '{id}'")]
    UnknownNode { id: String },
    #[error("node '{id}' cannot be linked to itself")]
    SelfLoop { id: String },
    #[error("link from '{parent}' to '{child}' already exists")]
    DuplicateLink { parent: String, child: String },
}

pub type Result<T> = std::result::Result<T, DagError>;
