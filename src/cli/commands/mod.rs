pub mod add;
pub mod config;
pub mod last_commit;
pub mod list;
pub mod master;
pub mod publish;
pub mod push;
pub mod serve;
