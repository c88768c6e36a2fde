//! CLI-specific modules for the `meekc` binary: argument parsing and the
//! compile-and-report driver (`SPEC_FULL.md` §6). Split into a library
//! target so `tests/driver_tests.rs` can exercise the driver without
//! shelling out to the binary.

pub mod args;
pub mod driver;
