mod func;
mod instance;
mod interface;
mod service;

pub use func::{Method, ServiceFactory};
pub(crate) use func::{Constructor, MethodDescriptor};
pub(crate) use service::AnySvc;
pub use instance::*;
pub use interface::*;
pub use service::*;
