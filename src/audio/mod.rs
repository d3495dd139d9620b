pub(crate) mod trigger;
pub(crate) mod voice;
