use thiserror::Error;

/// Errors that can occur during GPU context initialization.
#[derive(Debug, Error)]
pub enum RenderContextError {
    /// Failed to create a wgpu surface from the window handle.
    #[error("surface creation failed: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found: {0}")]
    AdapterRequest(#[from] wgpu::RequestAdapterError),
    /// GPU device request failed (limits or features not met).
    #[error("device request failed: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),
    /// Surface configuration not supported by the selected adapter.
    #[error("surface configuration not supported by adapter")]
    UnsupportedSurface,
}

/// Surface alpha mode for a transparent or opaque window, out of the modes
/// the surface supports.
fn pick_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    transparent: bool,
) -> wgpu::CompositeAlphaMode {
    use wgpu::CompositeAlphaMode as Mode;
    let preferred: &[Mode] = if transparent {
        &[Mode::PreMultiplied, Mode::PostMultiplied, Mode::Inherit]
    } else {
        &[Mode::Opaque]
    };
    preferred
        .iter()
        .copied()
        .find(|mode| supported.contains(mode))
        .or_else(|| supported.first().copied())
        .unwrap_or(Mode::Auto)
}

/// Owns the core wgpu resources: device, queue, surface, and configuration.
pub struct RenderContext {
    /// The wgpu logical device.
    pub device: wgpu::Device,
    /// The wgpu command queue.
    pub queue: wgpu::Queue,
    /// The window surface for presentation.
    pub surface: wgpu::Surface<'static>,
    /// Current surface configuration (format, size, present mode).
    pub config: wgpu::SurfaceConfiguration,
}

impl RenderContext {
    /// Create a new render context from the given window surface target and
    /// initial size in physical pixels. With `transparent` the surface
    /// composites with the desktop when the adapter offers such a mode.
    ///
    /// # Errors
    ///
    /// Returns `RenderContextError` if surface creation, adapter request,
    /// device request, or surface configuration fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
        transparent: bool,
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                power_preference: wgpu::PowerPreference::default(),
                ..Default::default()
            })
            .await?;
        log::info!("gpu: using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Viewport Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await?;

        let width = initial_size.0.max(1);
        let height = initial_size.1.max(1);
        let mut config = surface
            .get_default_config(&adapter, width, height)
            .ok_or(RenderContextError::UnsupportedSurface)?;
        config.present_mode = wgpu::PresentMode::Fifo;
        let alpha_modes = surface.get_capabilities(&adapter).alpha_modes;
        config.alpha_mode = pick_alpha_mode(&alpha_modes, transparent);
        log::debug!("gpu: surface alpha mode {:?}", config.alpha_mode);
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            surface,
            config,
        })
    }

    /// The surface texture format.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current surface size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure the surface for a new size. Returns `false` and leaves the
    /// surface alone for zero-sized dimensions.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        true
    }

    /// Re-apply the current configuration after the surface was lost.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquire the next swapchain texture for rendering.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the surface is lost, outdated,
    /// or timed out.
    pub fn get_next_frame(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Create a new command encoder for recording GPU commands.
    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Viewport Encoder"),
            })
    }

    /// Finish the encoder and submit its command buffer to the GPU queue.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use wgpu::CompositeAlphaMode as Mode;

    use super::*;

    #[test]
    fn transparent_surface_prefers_blending_modes() {
        let supported = [Mode::Opaque, Mode::PostMultiplied, Mode::PreMultiplied];
        assert_eq!(pick_alpha_mode(&supported, true), Mode::PreMultiplied);
        assert_eq!(pick_alpha_mode(&supported, false), Mode::Opaque);
    }

    #[test]
    fn unsupported_transparency_falls_back_to_first_mode() {
        assert_eq!(pick_alpha_mode(&[Mode::Opaque], true), Mode::Opaque);
        assert_eq!(pick_alpha_mode(&[], false), Mode::Auto);
    }
}
