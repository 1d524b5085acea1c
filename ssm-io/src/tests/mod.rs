//! Test modules for ssm-io
//!
//! Filesystem-level tests for packing working directories into archives and
//! extracting them again.
