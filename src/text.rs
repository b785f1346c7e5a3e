pub(crate) mod block;
pub(crate) mod engine;
pub(crate) mod wrap;
