//! Record tables.
//!
//! Joins the time, GPS and speed streams of each video into records,
//! concatenates videos into one dataset, and persists tables as CSV.

mod assemble;
mod record;
mod table;

pub use assemble::{
    join_streams, AssembleError, Assembler, Assembly, JoinOutcome, StreamSummary, VideoReport,
};
pub use record::{IndexedRecord, Record};
pub use table::{read_indexed, read_records, write_indexed, write_records, TableError};
