//! The individual tools. Each owns its record type, its clap surface
//! (`XxxCli` / `XxxCommand`), a `run_xxx_cli` dispatcher and a `schema()`
//! descriptor.

pub mod attendance;
pub mod books;
pub mod calc;
pub mod emi;
pub mod expr;
pub mod movies;
pub mod notes;
pub mod weather;
