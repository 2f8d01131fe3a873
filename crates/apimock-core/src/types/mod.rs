//! Descriptor, method and request/response types.

pub mod descriptor;
pub mod method;
pub mod request;
