pub mod headless_test;
pub mod schema_test;
