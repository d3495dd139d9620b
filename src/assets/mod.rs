pub(crate) mod decode;
pub(crate) mod resolver;
pub(crate) mod store;
