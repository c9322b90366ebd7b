//! cctrans - Caption and Metadata Translation Pipeline
//! 
//! Parses caption tracks and video metadata into ordered translation
//! batches, fans each batch out to every target language concurrently and
//! reassembles one finished artifact per language, without letting a
//! failing language corrupt or discard the others.

pub mod cli;
pub mod config;
pub mod error;
pub mod subtitle;
pub mod metadata;
pub mod translate;
pub mod reassemble;
pub mod catalog;
pub mod pipeline;
