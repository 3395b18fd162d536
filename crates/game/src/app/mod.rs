pub(crate) mod bootstrap;
pub(crate) mod gameplay;
pub(crate) mod level_loader;
pub(crate) mod loop_runner;
