pub mod guard;
pub mod permissions;
pub mod resolver;

pub use guard::*;
pub use permissions::*;
pub use resolver::*;
