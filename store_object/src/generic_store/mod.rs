pub mod core;
pub mod sql;
pub mod store_object;

pub use core::GenericStore;
