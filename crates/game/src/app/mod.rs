pub(crate) mod bootstrap;
mod host;
mod worlds;
