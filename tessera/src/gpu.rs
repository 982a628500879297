use std::{borrow::Cow, sync::Arc};

use tessera_math::{Rect, Vec2i};
use tracing::{debug, trace, warn};
use wgpu::{
    BindGroupDescriptor, BindGroupEntry, BindGroupLayoutDescriptor, BindGroupLayoutEntry,
    BindingResource, BindingType, ColorTargetState, ColorWrites, CommandEncoderDescriptor,
    CreateSurfaceError, Extent3d, FragmentState, ImageCopyTexture, ImageDataLayout, LoadOp,
    MultisampleState, Operations, Origin3d, PipelineLayoutDescriptor, PresentMode,
    PrimitiveState, RenderPassColorAttachment, RenderPassDescriptor, RenderPipelineDescriptor,
    RequestDeviceError, SamplerBindingType, SamplerDescriptor, ShaderModuleDescriptor,
    ShaderSource, ShaderStages, StoreOp, Surface, SurfaceConfiguration, SurfaceError,
    TextureAspect, TextureDescriptor, TextureDimension, TextureFormat, TextureSampleType,
    TextureUsages, TextureViewDescriptor, TextureViewDimension, VertexState,
};
use winit::window::Window;

use crate::{Canvas, Color, CopyOptions, RenderBackend, TesseraError, TesseraResult, Texture};

pub(crate) struct RenderDevice {
    instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl RenderDevice {
    pub(crate) fn new() -> TesseraResult<Self> {
        let flags = if cfg!(debug_assertions) {
            wgpu::InstanceFlags::DEBUG | wgpu::InstanceFlags::VALIDATION
        } else {
            wgpu::InstanceFlags::empty()
        };

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags,
            ..Default::default()
        });

        let Some(adapter) =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                force_fallback_adapter: false,
                compatible_surface: None,
            }))
        else {
            return Err(TesseraError::backend("failed to get graphics adapter"));
        };

        let required_limits =
            wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits());
        let mut in_limits = true;
        required_limits.check_limits_with_fail_fn(
            &adapter.limits(),
            false,
            |name, wanted, allowed| {
                warn!(name, wanted, allowed, "graphics limit not met");
                in_limits = false;
            },
        );
        if !in_limits {
            return Err(TesseraError::backend("graphics adapter is not capable enough"));
        }

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("device"),
                required_features: wgpu::Features::empty(),
                required_limits,
            },
            None,
        ))?;

        let info = adapter.get_info();
        debug!(adapter = %info.name, backend = ?info.backend, "graphics device ready");

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }
}

pub(crate) struct WindowSurface {
    surface: Option<Surface<'static>>,
    config: Option<SurfaceConfiguration>,
    vsync: bool,
}

impl WindowSurface {
    pub(crate) fn new(vsync: bool) -> Self {
        Self {
            surface: None,
            config: None,
            vsync,
        }
    }

    pub(crate) fn resume(&mut self, device: &RenderDevice, window: Arc<Window>) -> TesseraResult {
        let surface = device.instance.create_surface(window.clone())?;
        self.surface = Some(surface);

        let (width, height) = window.inner_size().into();
        self.reconfigure(device, width, height)
    }

    pub(crate) fn reconfigure(
        &mut self,
        device: &RenderDevice,
        width: u32,
        height: u32,
    ) -> TesseraResult {
        let Some(surface) = self.surface.as_ref() else {
            return Err(TesseraError::backend("window surface is not resumed"));
        };

        // A minimised window has no area to configure.
        if width == 0 || height == 0 {
            return Ok(());
        }

        let Some(mut config) = surface.get_default_config(&device.adapter, width, height) else {
            return Err(TesseraError::backend(
                "window surface configuration is not supported",
            ));
        };

        // Canvas pixels are already sRGB encoded, so they must not be encoded
        // a second time on write.
        let caps = surface.get_capabilities(&device.adapter);
        if let Some(format) = caps.formats.iter().copied().find(|f| !f.is_srgb()) {
            config.format = format;
        }
        config.present_mode = if self.vsync {
            PresentMode::AutoVsync
        } else {
            PresentMode::AutoNoVsync
        };

        surface.configure(&device.device, &config);
        self.config = Some(config);

        Ok(())
    }

    pub(crate) fn format(&self) -> Option<TextureFormat> {
        self.config.as_ref().map(|config| config.format)
    }

    /// Next texture to draw into, or `None` when the surface cannot be drawn
    /// to right now.
    pub(crate) fn acquire(
        &mut self,
        device: &RenderDevice,
    ) -> TesseraResult<Option<wgpu::SurfaceTexture>> {
        let (Some(surface), Some(config)) = (self.surface.as_ref(), self.config.as_ref()) else {
            return Ok(None);
        };

        match surface.get_current_texture() {
            Ok(texture) => Ok(Some(texture)),
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                surface.configure(&device.device, config);
                Err(TesseraError::backend("window surface was lost and has been reconfigured"))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub(crate) fn suspend(&mut self) {
        self.surface = None;
        self.config = None;
    }
}

/// Sampler and pipeline that draw a frame texture over the whole surface.
struct PresentPipeline {
    format: TextureFormat,
    sampler: wgpu::Sampler,
    layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
}

impl PresentPipeline {
    fn new(device: &RenderDevice, format: TextureFormat) -> Self {
        let sampler = device.device.create_sampler(&SamplerDescriptor {
            label: Some("present"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let layout = device
            .device
            .create_bind_group_layout(&BindGroupLayoutDescriptor {
                label: Some("present"),
                entries: &[
                    BindGroupLayoutEntry {
                        binding: 0,
                        visibility: ShaderStages::FRAGMENT,
                        ty: BindingType::Sampler(SamplerBindingType::Filtering),
                        count: None,
                    },
                    BindGroupLayoutEntry {
                        binding: 1,
                        visibility: ShaderStages::FRAGMENT,
                        ty: BindingType::Texture {
                            sample_type: TextureSampleType::Float { filterable: true },
                            view_dimension: TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                ],
            });

        let shader = device.device.create_shader_module(ShaderModuleDescriptor {
            label: Some("present"),
            source: ShaderSource::Wgsl(Cow::Borrowed(include_str!("shaders/present.wgsl"))),
        });

        let pipeline_layout = device
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some("present"),
                bind_group_layouts: &[&layout],
                push_constant_ranges: &[],
            });

        let pipeline = device
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some("present"),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    buffers: &[],
                },
                primitive: PrimitiveState::default(),
                depth_stencil: None,
                multisample: MultisampleState::default(),
                fragment: Some(FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    targets: &[Some(ColorTargetState {
                        format,
                        blend: None,
                        write_mask: ColorWrites::ALL,
                    })],
                }),
                multiview: None,
            });

        Self {
            format,
            sampler,
            layout,
            pipeline,
        }
    }
}

/// GPU copy of the canvas front buffer.
struct FrameTexture {
    width: u32,
    height: u32,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl FrameTexture {
    fn new(device: &RenderDevice, pipeline: &PresentPipeline, width: u32, height: u32) -> Self {
        let texture = device.device.create_texture(&TextureDescriptor {
            label: Some("frame"),
            size: Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8Unorm,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&TextureViewDescriptor {
            label: Some("frame"),
            ..Default::default()
        });

        let bind_group = device.device.create_bind_group(&BindGroupDescriptor {
            label: Some("frame"),
            layout: &pipeline.layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::Sampler(&pipeline.sampler),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::TextureView(&view),
                },
            ],
        });

        Self {
            width,
            height,
            texture,
            bind_group,
        }
    }

    fn upload(&self, device: &RenderDevice, pixels: &[u8]) {
        device.queue.write_texture(
            ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: Origin3d::ZERO,
                aspect: TextureAspect::All,
            },
            pixels,
            ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.width),
                rows_per_image: Some(self.height),
            },
            Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }
}

/// Render target for a window: sprites are drawn into a [`Canvas`] and every
/// present shows its front buffer on the window surface.
pub struct WindowPresenter {
    canvas: Canvas,
    device: RenderDevice,
    surface: WindowSurface,
    window: Option<Arc<Window>>,
    pipeline: Option<PresentPipeline>,
    frame: Option<FrameTexture>,
}

impl WindowPresenter {
    pub(crate) fn new(width: u32, height: u32, vsync: bool) -> TesseraResult<Self> {
        Ok(Self {
            canvas: Canvas::new(width, height),
            device: RenderDevice::new()?,
            surface: WindowSurface::new(vsync),
            window: None,
            pipeline: None,
            frame: None,
        })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub(crate) fn resume(&mut self, window: Arc<Window>) -> TesseraResult {
        self.surface.resume(&self.device, window.clone())?;
        self.window = Some(window);
        Ok(())
    }

    pub(crate) fn suspend(&mut self) {
        self.surface.suspend();
        self.window = None;
    }

    /// Follows a window resize: the surface is reconfigured and the canvas
    /// takes the new size.
    pub(crate) fn resize(&mut self, width: u32, height: u32) -> TesseraResult {
        if width == 0 || height == 0 {
            return Ok(());
        }

        self.canvas.resize(width, height);
        if self.window.is_some() {
            self.surface.reconfigure(&self.device, width, height)?;
        }
        Ok(())
    }

    fn draw_front(&mut self) -> TesseraResult {
        let Some(format) = self.surface.format() else {
            trace!("no window surface, frame not shown");
            return Ok(());
        };

        if self.pipeline.as_ref().map(|p| p.format) != Some(format) {
            self.pipeline = Some(PresentPipeline::new(&self.device, format));
            self.frame = None;
        }
        let Some(pipeline) = self.pipeline.as_ref() else {
            return Ok(());
        };

        let front = self.canvas.front();
        let size = (front.width(), front.height());
        let frame = match self.frame.take() {
            Some(frame) if (frame.width, frame.height) == size => frame,
            _ => FrameTexture::new(&self.device, pipeline, size.0, size.1),
        };
        frame.upload(&self.device, front.pixels());

        let Some(output) = self.surface.acquire(&self.device)? else {
            self.frame = Some(frame);
            return Ok(());
        };
        let view = output.texture.create_view(&TextureViewDescriptor {
            label: Some("window surface"),
            ..Default::default()
        });

        let mut encoder = self
            .device
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("present"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("window surface"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(wgpu::Color::BLACK),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rpass.set_pipeline(&pipeline.pipeline);
            rpass.set_bind_group(0, &frame.bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }
        self.device.queue.submit([encoder.finish()]);

        if let Some(window) = &self.window {
            window.pre_present_notify();
        }
        output.present();
        self.frame = Some(frame);

        Ok(())
    }
}

impl RenderBackend for WindowPresenter {
    fn output_size(&self) -> Vec2i {
        self.canvas.output_size()
    }

    fn clear(&mut self, color: Color) -> TesseraResult {
        self.canvas.clear(color)
    }

    fn copy(
        &mut self,
        texture: &Texture,
        src: Option<Rect>,
        dst: Rect,
        options: &CopyOptions,
    ) -> TesseraResult {
        self.canvas.copy(texture, src, dst, options)
    }

    fn fill(&mut self, rect: Rect, color: Color) -> TesseraResult {
        self.canvas.fill(rect, color)
    }

    fn present(&mut self) -> TesseraResult {
        self.canvas.present()?;
        self.draw_front()
    }
}

impl From<CreateSurfaceError> for TesseraError {
    fn from(err: CreateSurfaceError) -> Self {
        TesseraError::backend("failed to create window surface").with_source(err)
    }
}

impl From<SurfaceError> for TesseraError {
    fn from(err: SurfaceError) -> Self {
        TesseraError::backend("failed to acquire window surface texture").with_source(err)
    }
}

impl From<RequestDeviceError> for TesseraError {
    fn from(err: RequestDeviceError) -> Self {
        TesseraError::backend("failed to get graphics queue").with_source(err)
    }
}
