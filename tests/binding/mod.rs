pub mod lifecycle_test;
pub mod options_test;
