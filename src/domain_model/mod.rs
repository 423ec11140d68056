mod provider;
mod token;
mod user;

pub use provider::*;
pub use token::*;
pub use user::*;
