pub(crate) mod app;
pub(crate) mod config;
pub(crate) mod effects;
pub(crate) mod logging;
pub(crate) mod persistence;
