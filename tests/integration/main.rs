//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the capture engine
//! against the mock channel driver.  All tests run on the host with no
//! real timer required.

mod lifecycle_tests;
