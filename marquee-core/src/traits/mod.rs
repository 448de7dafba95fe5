//! Seams between the controller and its replaceable parts

pub mod color;

pub use color::ColorSource;
