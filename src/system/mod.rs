pub mod collector;
pub mod group;
pub mod history;
pub mod info;
pub mod instances;
pub mod kill;
pub mod monitor;
pub mod platform;
pub mod process;
pub mod query;
pub mod sampler;
pub mod snapshot;
pub mod source;
pub mod store;
