//! Texture assets: decoding images from an asset directory into GPU textures.

mod asset;

pub use asset::{AssetSource, TextureAsset};
