pub mod fusion;
pub mod shape;
