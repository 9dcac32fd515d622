/// Algorithms that keep an explicit value for every state-action pair
pub mod tabular;
