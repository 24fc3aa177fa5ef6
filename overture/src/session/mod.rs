pub(crate) mod export;
pub(crate) mod host;
pub(crate) mod intro;
pub(crate) mod sim;
