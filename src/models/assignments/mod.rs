pub mod entities;
pub mod filters;
pub mod requests;
pub mod responses;
pub mod status;

pub use entities::*;
pub use filters::*;
pub use requests::*;
pub use responses::*;
pub use status::*;
