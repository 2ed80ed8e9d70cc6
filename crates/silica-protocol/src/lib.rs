//! Wire contracts shared between the silica service and its clients.

pub mod job;
pub mod payload;

pub use job::{GenomeIndexEntry, JobParameters, SAMPLE_FASTA, SAMPLE_GENOME};
pub use payload::{Amplicon, Payload, PayloadData, PrimerSite, ServiceErrorBody, ServiceErrorItem, Strand};
