pub mod jwt;
pub mod route;

pub use jwt::*;
pub use route::*;
