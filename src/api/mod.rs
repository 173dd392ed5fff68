pub mod body;
pub mod path;

pub use body::JsonBody;
pub use path::PathParam;
