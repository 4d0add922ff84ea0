//! Runtime enrichment tests

mod registry_passes;
