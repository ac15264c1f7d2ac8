mod build_apks;


pub use build_apks::{ApkBuildMode, BuildApksCommand};
