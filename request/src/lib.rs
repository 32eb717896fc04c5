mod error;
mod method;
mod request;
mod response;

pub use error::*;
pub use method::RequestMethod;
pub use request::Request;
pub use response::Response;
