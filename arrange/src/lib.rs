//! Application-side glue around the [`bednest`] engine: a scene model
//! (objects × instances × virtual beds), item-list preparation with
//! selected/fixed/locked partitioning and a synthetic wipe-tower item,
//! result write-back and unfit reporting.

pub mod io;
pub mod job;
pub mod params;
pub mod scene;
