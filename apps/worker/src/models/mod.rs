pub mod check;

pub use check::{Check, CheckState, Method, Protocol};
