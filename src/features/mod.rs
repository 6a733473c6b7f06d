//! Features layer - HTTP surface built on top of the storage modules

pub mod media;
