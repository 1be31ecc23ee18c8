mod dispatcher_tests;
pub mod utils;
