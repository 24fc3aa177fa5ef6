pub(crate) mod compose;
pub(crate) mod display;
pub(crate) mod particles;
pub(crate) mod phases;
