mod sru;

pub use sru::{Bug, Report, Sru};
