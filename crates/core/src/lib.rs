//! Domain logic for the keepsake content services.
//!
//! Everything here is pure: no sockets, no driver handles, no global
//! state. The `keepsake-db` and `keepsake-cloud` crates translate
//! between stored representations and these types; `keepsake-api`
//! orchestrates them into HTTP services.

pub mod carousel;
pub mod cursor;
pub mod error;
pub mod images;
pub mod stock;
pub mod timer;
pub mod types;
