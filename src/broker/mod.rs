pub mod engine;
pub mod topic;

pub use engine::Broker;

#[cfg(test)]
mod tests;
