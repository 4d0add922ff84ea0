//! Static extraction tests

mod manifest_tests;
mod registry_tests;
