pub mod candidate;
pub mod posting;
pub mod recommendation;
