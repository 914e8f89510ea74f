pub(crate) mod animator;
pub(crate) mod config;
pub(crate) mod drawing;
pub(crate) mod pen;
