#![doc = "Offline batch pipelines for tile-binned population counts and merged place datasets"]
mod common;
mod io;

pub mod cli;
pub mod commands;
pub mod mobility;
pub mod place;
pub mod tile;
pub mod window;

#[doc(inline)]
pub use mobility::{Ping, RunReport, WindowedPing};

#[doc(inline)]
pub use place::{MergeReport, PlaceManifest, RoadSegment};
