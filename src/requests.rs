mod arg;
mod info;
mod request;

pub use arg::*;
pub use info::*;
pub use request::*;
pub(crate) use request::request_parameter;
