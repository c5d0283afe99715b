use thiserror::Error;

use crate::view::Layer;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("no ancestor provided a value of type `{type_name}`")]
    Missing { type_name: &'static str },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("nothing is mounted")]
    NotMounted,
    #[error("no {kind} matches \"{label}\"")]
    NoTarget { kind: &'static str, label: String },
    #[error("\"{label}\" is covered by the presented {active:?} layer")]
    Blocked { label: String, active: Layer },
    #[error("no sheet is presented")]
    NoSheet,
    #[error("the presented sheet has interactive dismiss disabled")]
    DismissDisabled,
}
