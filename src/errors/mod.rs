mod method_error;

pub use method_error::{MethodError, MethodErrorKind};
