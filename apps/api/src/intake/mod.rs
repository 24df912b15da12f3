// Input Collector: form payloads, validated records and the option catalogue.
// No network or session writes happen in this module.

pub mod catalog;
pub mod collector;
pub mod models;
