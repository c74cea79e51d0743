use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

/// Directory that named assets are resolved against.
#[derive(Debug, Clone)]
pub struct AssetSource {
    root: PathBuf,
}

impl AssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.resolve(name);
        std::fs::read(&path).with_context(|| format!("failed to read asset {}", path.display()))
    }
}

impl Default for AssetSource {
    fn default() -> Self {
        Self::new("assets")
    }
}

/// A decoded 2-D texture resident on the GPU, with the sampler used to read
/// it. Shared between figures through `Arc`.
pub struct TextureAsset {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl TextureAsset {
    /// Loads and decodes the image `name` from `source`.
    pub fn load_asset(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        source: &AssetSource,
        name: &str,
    ) -> Result<Arc<Self>> {
        let bytes = source.read(name)?;
        let img = image::load_from_memory(&bytes)
            .with_context(|| format!("failed to decode image {name}"))?
            .to_rgba8();

        let (width, height) = img.dimensions();
        log::info!("loaded texture {name} ({width}x{height})");
        Ok(Arc::new(Self::from_rgba(device, queue, &img, width, height)))
    }

    /// Uploads tightly packed RGBA8 (sRGB) pixels.
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &[u8],
        width: u32,
        height: u32,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tumble figure texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tumble figure sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            _texture: texture,
            view,
            sampler,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_under_the_root() {
        let source = AssetSource::new("/data/app");
        assert_eq!(source.resolve("crate.png"), PathBuf::from("/data/app/crate.png"));
    }

    #[test]
    fn missing_asset_reports_the_path() {
        let source = AssetSource::new("/definitely/not/here");
        let err = source.read("nothing.png").unwrap_err();
        assert!(format!("{err:#}").contains("nothing.png"));
    }
}
