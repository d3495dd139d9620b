pub(crate) mod composite;
pub(crate) mod compositor;
pub(crate) mod frame_cache;
pub(crate) mod surface;
