use super::error::StoreError;
use super::value::{Arg, Value};

/// Capability to run one store command and return its reply.
///
/// Implementations run every call inside the atomic context the whole
/// transaction executes in. `&mut self` means a single request holds the
/// invoker exclusively from its first condition to its last exec command.
pub trait CommandInvoker {
    /// Execute `name` with positional `args` and return the reply
    fn invoke(&mut self, name: &str, args: &[Arg]) -> Result<Value, StoreError>;
}

impl<T: CommandInvoker + ?Sized> CommandInvoker for &mut T {
    fn invoke(&mut self, name: &str, args: &[Arg]) -> Result<Value, StoreError> {
        (**self).invoke(name, args)
    }
}

impl<T: CommandInvoker + ?Sized> CommandInvoker for Box<T> {
    fn invoke(&mut self, name: &str, args: &[Arg]) -> Result<Value, StoreError> {
        (**self).invoke(name, args)
    }
}
