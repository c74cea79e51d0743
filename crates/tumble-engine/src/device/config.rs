/// Depth formats offered for every surface color format, in enumeration order.
pub const DEPTH_FORMATS: [wgpu::TextureFormat; 4] = [
    wgpu::TextureFormat::Depth32Float,
    wgpu::TextureFormat::Depth24Plus,
    wgpu::TextureFormat::Depth24PlusStencil8,
    wgpu::TextureFormat::Depth16Unorm,
];

const REQUIRED_COLOR_BITS: u8 = 8;
const REQUIRED_DEPTH_BITS: u8 = 24;

/// One candidate framebuffer configuration: a surface color format paired
/// with a depth attachment format.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FramebufferConfig {
    pub color_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
    pub depth_bits: u8,
    /// The surface can be used as a render attachment.
    pub window_drawable: bool,
}

impl FramebufferConfig {
    /// Builds a candidate, or `None` when either format has no meaningful
    /// channel/depth size (compressed, integer or non-depth formats).
    pub fn new(
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        window_drawable: bool,
    ) -> Option<Self> {
        let (red_bits, green_bits, blue_bits) = color_bits(color_format)?;
        let depth_bits = depth_bits(depth_format)?;
        Some(Self {
            color_format,
            depth_format,
            red_bits,
            green_bits,
            blue_bits,
            depth_bits,
            window_drawable,
        })
    }

    fn is_exact_match(&self) -> bool {
        self.window_drawable
            && self.red_bits == REQUIRED_COLOR_BITS
            && self.green_bits == REQUIRED_COLOR_BITS
            && self.blue_bits == REQUIRED_COLOR_BITS
            && self.depth_bits == REQUIRED_DEPTH_BITS
    }
}

/// Enumerates candidates from surface capabilities: every supported color
/// format (driver order) crossed with [`DEPTH_FORMATS`].
pub fn enumerate_configs(caps: &wgpu::SurfaceCapabilities) -> Vec<FramebufferConfig> {
    let window_drawable = caps.usages.contains(wgpu::TextureUsages::RENDER_ATTACHMENT);

    caps.formats
        .iter()
        .flat_map(|&color| {
            DEPTH_FORMATS
                .iter()
                .filter_map(move |&depth| FramebufferConfig::new(color, depth, window_drawable))
        })
        .collect()
}

/// Picks the first candidate with 8-bit red/green/blue channels and a 24-bit
/// depth buffer that can be drawn to a window.
///
/// There is no fallback: `None` means the device cannot host this renderer.
pub fn choose_config(candidates: &[FramebufferConfig]) -> Option<FramebufferConfig> {
    candidates.iter().copied().find(FramebufferConfig::is_exact_match)
}

fn color_bits(format: wgpu::TextureFormat) -> Option<(u8, u8, u8)> {
    use wgpu::TextureFormat as F;
    match format {
        F::Rgba8Unorm | F::Rgba8UnormSrgb | F::Bgra8Unorm | F::Bgra8UnormSrgb => Some((8, 8, 8)),
        F::Rgb10a2Unorm => Some((10, 10, 10)),
        F::Rgba16Float => Some((16, 16, 16)),
        F::Rgba32Float => Some((32, 32, 32)),
        _ => None,
    }
}

fn depth_bits(format: wgpu::TextureFormat) -> Option<u8> {
    use wgpu::TextureFormat as F;
    match format {
        F::Depth16Unorm => Some(16),
        F::Depth24Plus | F::Depth24PlusStencil8 => Some(24),
        F::Depth32Float | F::Depth32FloatStencil8 => Some(32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat as F;

    fn cfg(color: F, depth: F) -> FramebufferConfig {
        FramebufferConfig::new(color, depth, true).unwrap()
    }

    // ── choose_config ─────────────────────────────────────────────────────

    #[test]
    fn picks_the_only_exact_match() {
        let list = [
            cfg(F::Rgba16Float, F::Depth24Plus),
            cfg(F::Bgra8Unorm, F::Depth32Float),
            cfg(F::Bgra8Unorm, F::Depth24Plus),
            cfg(F::Bgra8Unorm, F::Depth16Unorm),
        ];
        assert_eq!(choose_config(&list), Some(list[2]));
    }

    #[test]
    fn first_match_wins_in_enumeration_order() {
        let list = [
            cfg(F::Rgb10a2Unorm, F::Depth24Plus),
            cfg(F::Rgba8UnormSrgb, F::Depth24PlusStencil8),
            cfg(F::Bgra8UnormSrgb, F::Depth24Plus),
        ];
        assert_eq!(choose_config(&list), Some(list[1]));
    }

    #[test]
    fn no_match_yields_none() {
        let list = [
            cfg(F::Rgba16Float, F::Depth24Plus),
            cfg(F::Bgra8Unorm, F::Depth32Float),
        ];
        assert_eq!(choose_config(&list), None);
        assert_eq!(choose_config(&[]), None);
    }

    #[test]
    fn non_drawable_candidates_are_skipped() {
        let hidden = FramebufferConfig::new(F::Bgra8Unorm, F::Depth24Plus, false).unwrap();
        let shown = cfg(F::Rgba8Unorm, F::Depth24Plus);
        assert_eq!(choose_config(&[hidden, shown]), Some(shown));
    }

    // ── enumerate_configs ─────────────────────────────────────────────────

    fn caps(formats: Vec<F>, usages: wgpu::TextureUsages) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            present_modes: vec![wgpu::PresentMode::Fifo],
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
            usages,
        }
    }

    #[test]
    fn enumeration_is_color_major_over_depth_formats() {
        let caps = caps(
            vec![F::Rgba16Float, F::Bgra8UnormSrgb],
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let list = enumerate_configs(&caps);

        let pairs: Vec<(F, F)> = list.iter().map(|c| (c.color_format, c.depth_format)).collect();
        let expected: Vec<(F, F)> = [F::Rgba16Float, F::Bgra8UnormSrgb]
            .into_iter()
            .flat_map(|color| DEPTH_FORMATS.into_iter().map(move |depth| (color, depth)))
            .collect();
        assert_eq!(pairs, expected);
        assert!(list.iter().all(|c| c.window_drawable));

        // Depth32Float comes first, so the Depth24Plus pairing is chosen.
        assert_eq!(
            choose_config(&list).map(|c| (c.color_format, c.depth_format)),
            Some((F::Bgra8UnormSrgb, F::Depth24Plus))
        );
    }

    #[test]
    fn unsized_surface_formats_are_dropped() {
        let list = enumerate_configs(&caps(
            vec![F::R8Uint, F::Rgba8Unorm],
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        ));
        assert_eq!(list.len(), DEPTH_FORMATS.len());
        assert!(list.iter().all(|c| c.color_format == F::Rgba8Unorm));
    }

    #[test]
    fn surface_without_render_attachment_is_not_drawable() {
        let list = enumerate_configs(&caps(vec![F::Bgra8Unorm], wgpu::TextureUsages::COPY_SRC));
        assert_eq!(list.len(), DEPTH_FORMATS.len());
        assert!(list.iter().all(|c| !c.window_drawable));
        assert_eq!(choose_config(&list), None);
    }

    // ── FramebufferConfig::new ────────────────────────────────────────────

    #[test]
    fn unsized_formats_are_not_candidates() {
        assert!(FramebufferConfig::new(F::R8Uint, F::Depth24Plus, true).is_none());
        assert!(FramebufferConfig::new(F::Bgra8Unorm, F::Rgba8Unorm, true).is_none());
    }

    #[test]
    fn bit_counts_are_reported() {
        let c = cfg(F::Rgb10a2Unorm, F::Depth16Unorm);
        assert_eq!((c.red_bits, c.green_bits, c.blue_bits, c.depth_bits), (10, 10, 10, 16));
    }
}
