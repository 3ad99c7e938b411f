//! Configuration module

mod site;

pub use site::BlogConfig;
