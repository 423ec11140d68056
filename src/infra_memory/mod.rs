mod token_cache_memory;

pub use token_cache_memory::*;
