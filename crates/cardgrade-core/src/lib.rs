pub mod config;
pub mod consts;
pub mod error;
pub mod export;
pub mod geometry;
pub mod homography;
pub mod interaction;
pub mod io;
pub mod linalg;
pub mod magnifier;
pub mod measure;
pub mod project;
pub mod quad;
pub mod rectify;
pub mod viewport;
