pub mod iracing;
