use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("fractional exponent does not reduce to integer dimensions")]
    NonIntegerDim,
}
