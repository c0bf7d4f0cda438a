//! Flat-file I/O: CSV tables and shapefile layers.

pub(crate) mod csv;
pub(crate) mod shp;
