pub mod index;
pub mod push;
pub mod registry;
pub mod remote_url;
pub mod repo;
pub mod store;
