mod artisan;
mod build;
mod doctor;
mod init;
pub(crate) mod mcp;
mod pipeline;
mod serve;

pub use artisan::artisan;
pub use build::{build, dockerfile};
pub use doctor::doctor;
pub use init::init;
pub use pipeline::Options;
pub use serve::serve;
