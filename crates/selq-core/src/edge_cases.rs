//! Edge case tests for selq-core
