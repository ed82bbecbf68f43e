pub mod lines;
pub mod query;
pub mod subscriber;

pub use lines::*;
pub use query::*;
pub use subscriber::*;
