use thiserror::Error;

#[derive(Error, Debug)]
pub enum MjcfError {
    #[error("xml error: {0}")]
    Xml(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing <{element}> in {context}")]
    MissingElement {
        element: &'static str,
        context: &'static str,
    },
    #[error("invalid {attribute}=\"{value}\" on <{element}>")]
    InvalidAttribute {
        element: String,
        attribute: &'static str,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, MjcfError>;
