// author: kodeholic (powered by Claude)

pub mod library;

pub use library::{ClipPath, VoiceAssets, VoiceLibrary};
