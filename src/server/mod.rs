mod cache_sweeper;
mod server;

pub use cache_sweeper::*;
pub use server::*;
