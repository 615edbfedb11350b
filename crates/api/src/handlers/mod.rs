//! Request handlers, one module per service.

pub mod carousel;
pub mod media;
pub mod moments;
pub mod stock;
pub mod timeline;
pub mod timer;
