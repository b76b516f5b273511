pub mod item_service;
#[cfg(test)]
mod item_service_tests;
