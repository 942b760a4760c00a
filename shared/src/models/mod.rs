//! Domain models for the Store Back Office

mod client;
mod inventory;
mod product;
mod quote;
mod sale;

pub use client::*;
pub use inventory::*;
pub use product::*;
pub use quote::*;
pub use sale::*;
