pub mod props_test;
pub mod schema_test;
