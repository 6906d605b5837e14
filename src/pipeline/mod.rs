pub mod extraction;
pub mod seal;
