pub mod api;
#[cfg(test)]
pub mod fake;
