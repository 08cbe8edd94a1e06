pub mod common;
pub mod error_tests;
pub mod google_tests;
pub mod mock_server;
pub mod oidc_tests;
