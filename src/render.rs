pub(crate) mod surface;
pub(crate) mod card;
pub(crate) mod layout;
