pub mod build;
pub mod classify;
pub mod error;
pub mod ngram;
pub mod postings;
pub mod repo;

pub use build::{Document, IndexBuilder};
pub use classify::is_text;
pub use error::BuildError;
pub use ngram::Ngram;
pub use postings::{PostingsBuilder, SearchableString};
pub use repo::{RepositoryDescriptor, SubRepoIndex};

// All u32: a shard is sealed once any of these would overflow.
pub type DocID = u32;
pub type RuneOffset = u32;
pub type ByteOffset = u32;

// Sample stride for the rune->byte offset table in postings::PostingsBuilder.
pub const RUNE_OFFSET_STRIDE: u32 = 100;

// Branch membership is packed into a single word.
pub const MAX_BRANCHES: usize = 32;

pub const MAX_LINE_SIZE: usize = 1000;
pub const MAX_TRIGRAM_COUNT: usize = 20_000;
pub const NGRAM_SIZE: usize = 3;
