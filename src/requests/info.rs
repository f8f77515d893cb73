use crate::{Args, InjectError, ServiceInfo};
use std::fmt::{Display, Formatter};

/// What the container was doing when a parameter was requested. This is
/// carried by [`InjectError::UnresolvedParameter`] to make failures
/// actionable.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Activation {
    /// A new instance of a type is being constructed.
    Instantiating(ServiceInfo),

    /// A method is being invoked on an existing instance.
    Invoking {
        /// The name of the method.
        method: String,
        /// The type of the instance the method is invoked on.
        target: ServiceInfo,
    },
}

impl Display for Activation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Activation::Instantiating(service_info) => {
                write!(f, "instantiating {}", service_info.name())
            }
            Activation::Invoking { method, target } => {
                write!(f, "invoking {} on {}", method, target.name())
            }
        }
    }
}

/// Information about the parameter currently being resolved: the activation
/// it belongs to, the explicitly supplied arguments, and its position.
#[derive(Clone, Copy, Debug)]
pub struct RequestInfo<'a> {
    activation: &'a Activation,
    args: &'a Args,
    parameter: usize,
}

impl<'a> RequestInfo<'a> {
    /// Creates request information for the first parameter of an activation.
    #[must_use]
    pub fn new(activation: &'a Activation, args: &'a Args) -> Self {
        RequestInfo {
            activation,
            args,
            parameter: 0,
        }
    }

    /// Creates a copy of this request pointing at another parameter.
    #[must_use]
    pub fn with_parameter(&self, parameter: usize) -> Self {
        RequestInfo { parameter, ..*self }
    }

    /// Gets the activation this request is part of.
    #[must_use]
    pub fn activation(&self) -> &'a Activation {
        self.activation
    }

    /// Gets the explicitly supplied arguments for the activation.
    #[must_use]
    pub fn args(&self) -> &'a Args {
        self.args
    }

    /// Gets the zero-based position of the parameter being resolved.
    #[must_use]
    pub fn parameter(&self) -> usize {
        self.parameter
    }

    /// Creates the error returned when this parameter, declared as `T`,
    /// cannot be resolved.
    #[must_use]
    pub fn unresolved<T: ?Sized + 'static>(&self) -> InjectError {
        InjectError::UnresolvedParameter {
            parameter: ServiceInfo::of::<T>(),
            index: self.parameter,
            activation: self.activation.clone(),
        }
    }
}
