pub mod cart_rules;
mod host_selector;

pub use host_selector::HostSelector;
