pub(crate) mod intro;
