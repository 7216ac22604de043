macro_rules! general_err {
    ($fmt:expr) => (arrow::error::Error::OutOfSpec($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (arrow::error::Error::OutOfSpec(format!($fmt, $($args),*)));
}

macro_rules! nyi_err {
    ($fmt:expr) => (arrow::error::Error::NotYetImplemented($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (arrow::error::Error::NotYetImplemented(format!($fmt, $($args),*)));
}

macro_rules! invalid_arg_err {
    ($fmt:expr) => (arrow::error::Error::InvalidArgumentError($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (arrow::error::Error::InvalidArgumentError(format!($fmt, $($args),*)));
}
