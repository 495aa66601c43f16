pub mod add;
pub mod delete;
pub mod due;
pub mod preview;
pub mod review;
pub mod stats;
