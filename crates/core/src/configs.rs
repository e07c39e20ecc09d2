//! Configuration parsing for plugin projects

pub mod project;
