pub mod svd;
pub mod vector;
