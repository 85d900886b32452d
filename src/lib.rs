//! Fast and exact distance queries on customizable road networks.
//!
//! The heart of this crate is a customizable transit node routing index:
//! a nested dissection separator hierarchy yields a small set of transit nodes,
//! long range queries are answered from a precomputed transit distance table
//! through per-vertex access nodes, and short range queries fall back to an
//! elimination tree search on a customizable contraction hierarchy.

#[macro_use]
pub mod report;
pub mod algo;
pub mod datastr;
pub mod io;
pub mod util;
