//! Export of reachability results.
//!
//! Results are written as JSON Lines (one JSON object per result), the
//! format best suited to piping into `jq` or loading into other tools.

mod jsonl;

pub use jsonl::{open_output, write_jsonl, IgnoreBrokenPipe};
