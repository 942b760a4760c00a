//! Business services
//!
//! Each service owns a PgPool clone and the store policy it needs. Handlers
//! construct services per request; all cross-entity work (sales touching
//! inventory and invoices, quotes touching counters) happens inside a single
//! transaction within the owning service.

pub mod client;
pub mod inventory;
pub mod product;
pub mod quote;
pub mod sale;
pub mod sequence;

pub use client::ClientService;
pub use inventory::InventoryService;
pub use product::ProductService;
pub use quote::QuoteService;
pub use sale::SaleService;
