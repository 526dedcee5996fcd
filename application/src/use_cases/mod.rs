//! Use cases (application services)

pub mod content_history;
pub mod generate_content;

#[cfg(test)]
pub(crate) mod test_support;
