pub mod email;
pub mod pairwise;
pub mod panels;
pub mod plot;
pub mod sorter;
