pub(crate) mod decode;
pub(crate) mod fonts;
pub(crate) mod resolve;
