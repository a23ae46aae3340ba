pub mod filter;
pub mod layers;
pub mod list_sync;
pub mod selection;
