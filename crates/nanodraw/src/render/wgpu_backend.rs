use crate::batch::{BindingKey, BufferId, ProgramId, TextureId, Topology, Vertex};
use crate::coords::Projection;
use crate::error::DrawError;
use crate::paint::Color;

use super::{ProgramSource, Rasterizer};

const GLOBALS_SIZE: u64 = std::mem::size_of::<Projection>() as u64;

/// Backend configuration.
#[derive(Debug, Clone)]
pub struct WgpuConfig {
    /// Format of the views passed to [`WgpuRasterizer::set_target`].
    pub target_format: wgpu::TextureFormat,

    /// Cleared on the first pass of every frame. `None` keeps previous contents.
    pub clear_color: Option<Color>,
}

impl Default for WgpuConfig {
    fn default() -> Self {
        Self {
            target_format: wgpu::TextureFormat::Rgba8UnormSrgb,
            clear_color: Some(Color::BLACK),
        }
    }
}

struct GpuProgram {
    globals_ubo: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    triangles: wgpu::RenderPipeline,
    lines: wgpu::RenderPipeline,
}

impl GpuProgram {
    fn pipeline(&self, topology: Topology) -> &wgpu::RenderPipeline {
        match topology {
            Topology::TriangleList => &self.triangles,
            Topology::LineList => &self.lines,
        }
    }
}

struct GpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// [`Rasterizer`] over wgpu.
///
/// Every flush becomes its own command buffer: one render pass, one draw,
/// one `queue.submit`. Uploads go through `queue.write_buffer`, which is
/// ordered before the next submit, so reusing one vertex buffer for many
/// flushes per frame is safe.
///
/// Untextured batches bind a 1x1 white texture so one pipeline layout serves
/// shapes and glyphs.
pub struct WgpuRasterizer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: WgpuConfig,

    globals_bgl: wgpu::BindGroupLayout,
    texture_bgl: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    sampler: wgpu::Sampler,
    white: GpuTexture,

    programs: Vec<GpuProgram>,
    textures: Vec<GpuTexture>,
    buffers: Vec<wgpu::Buffer>,

    target: Option<wgpu::TextureView>,
    clear_pending: bool,
    warned_no_target: bool,
}

impl WgpuRasterizer {
    /// Wraps an existing device/queue pair owned by the frame host.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, config: WgpuConfig) -> Self {
        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("nanodraw globals bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(GLOBALS_SIZE),
                },
                count: None,
            }],
        });

        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("nanodraw texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("nanodraw pipeline layout"),
            bind_group_layouts: &[&globals_bgl, &texture_bgl],
            immediate_size: 0,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("nanodraw atlas sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let white = upload_coverage(&device, &queue, &texture_bgl, &sampler, 1, 1, &[0xFF], "nanodraw white");

        Self {
            device,
            queue,
            config,
            globals_bgl,
            texture_bgl,
            pipeline_layout,
            sampler,
            white,
            programs: Vec::new(),
            textures: Vec::new(),
            buffers: Vec::new(),
            target: None,
            clear_pending: false,
            warned_no_target: false,
        }
    }

    /// Creates its own device on the best available adapter, without a surface.
    ///
    /// Blocks on adapter/device acquisition.
    pub fn new_headless(config: WgpuConfig) -> Result<Self, DrawError> {
        let (device, queue) = pollster::block_on(request_headless_device())?;
        Ok(Self::new(device, queue, config))
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn config(&self) -> &WgpuConfig {
        &self.config
    }

    /// Sets the view that subsequent frames render into.
    ///
    /// Its format must match [`WgpuConfig::target_format`].
    pub fn set_target(&mut self, view: wgpu::TextureView) {
        self.target = Some(view);
    }

    fn create_pipeline(
        &self,
        label: &str,
        vs: &wgpu::ShaderModule,
        fs: &wgpu::ShaderModule,
        topology: wgpu::PrimitiveTopology,
    ) -> wgpu::RenderPipeline {
        self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: vs,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: fs,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.config.target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }

    fn load_op(&mut self) -> wgpu::LoadOp<wgpu::Color> {
        match (self.clear_pending, self.config.clear_color) {
            (true, Some(c)) => {
                self.clear_pending = false;
                wgpu::LoadOp::Clear(wgpu::Color {
                    r: c.r as f64,
                    g: c.g as f64,
                    b: c.b as f64,
                    a: c.a as f64,
                })
            }
            _ => wgpu::LoadOp::Load,
        }
    }

    fn has_target_or_warn(&mut self) -> bool {
        if self.target.is_none() && !self.warned_no_target {
            log::warn!("WgpuRasterizer: no render target set; draws are dropped");
            self.warned_no_target = true;
        }
        self.target.is_some()
    }
}

impl Rasterizer for WgpuRasterizer {
    fn compile_program(&mut self, source: &ProgramSource<'_>) -> Result<ProgramId, DrawError> {
        validate_wgsl(source.label, source.vertex)?;
        if source.fragment != source.vertex {
            validate_wgsl(source.label, source.fragment)?;
        }

        let vs = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(source.label),
            source: wgpu::ShaderSource::Wgsl(source.vertex.into()),
        });
        let separate_fs = (source.fragment != source.vertex).then(|| {
            self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(source.label),
                source: wgpu::ShaderSource::Wgsl(source.fragment.into()),
            })
        });
        let fs = separate_fs.as_ref().unwrap_or(&vs);

        let triangles = self.create_pipeline(source.label, &vs, fs, wgpu::PrimitiveTopology::TriangleList);
        let lines = self.create_pipeline(source.label, &vs, fs, wgpu::PrimitiveTopology::LineList);

        let globals_ubo = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("nanodraw globals ubo"),
            size: GLOBALS_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("nanodraw globals bind group"),
            layout: &self.globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_ubo.as_entire_binding(),
            }],
        });

        self.programs.push(GpuProgram {
            globals_ubo,
            globals_bind_group,
            triangles,
            lines,
        });
        log::debug!("compiled program '{}'", source.label);
        Ok(ProgramId(self.programs.len() as u32 - 1))
    }

    fn create_vertex_buffer(&mut self, byte_capacity: u64) -> Result<BufferId, DrawError> {
        let max = self.device.limits().max_buffer_size;
        if byte_capacity == 0 || byte_capacity > max {
            return Err(DrawError::Resource(format!(
                "vertex buffer of {byte_capacity} bytes is outside (0, {max}]"
            )));
        }
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("nanodraw vertex buffer"),
            size: byte_capacity,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.buffers.push(buffer);
        Ok(BufferId(self.buffers.len() as u32 - 1))
    }

    fn create_texture(&mut self, width: u32, height: u32, pixels: &[u8]) -> Result<TextureId, DrawError> {
        let max = self.device.limits().max_texture_dimension_2d;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(DrawError::Resource(format!(
                "texture {width}x{height} is outside 1..={max}"
            )));
        }
        let expected = width as usize * height as usize;
        if pixels.len() < expected {
            return Err(DrawError::Resource(format!(
                "texture {width}x{height} needs {expected} bytes, got {}",
                pixels.len()
            )));
        }

        let texture = upload_coverage(
            &self.device,
            &self.queue,
            &self.texture_bgl,
            &self.sampler,
            width,
            height,
            &pixels[..expected],
            "nanodraw atlas",
        );
        self.textures.push(texture);
        Ok(TextureId(self.textures.len() as u32 - 1))
    }

    fn begin_frame(&mut self, program: ProgramId, projection: &Projection) {
        let Some(p) = self.programs.get(program.0 as usize) else {
            log::warn!("WgpuRasterizer: begin_frame with unknown {program:?}");
            return;
        };
        self.queue
            .write_buffer(&p.globals_ubo, 0, bytemuck::cast_slice(projection.as_slice()));
        self.clear_pending = self.config.clear_color.is_some();
    }

    fn upload(&mut self, buffer: BufferId, bytes: &[u8]) {
        let Some(buf) = self.buffers.get(buffer.0 as usize) else {
            log::warn!("WgpuRasterizer: upload to unknown {buffer:?}");
            return;
        };
        self.queue.write_buffer(buf, 0, bytes);
    }

    fn submit(&mut self, buffer: BufferId, binding: &BindingKey, vertex_count: u32) {
        if !self.has_target_or_warn() {
            return;
        }
        let load = self.load_op();
        let Some(view) = self.target.as_ref() else { return };

        let Some(program) = self.programs.get(binding.program.0 as usize) else {
            log::warn!("WgpuRasterizer: submit with unknown {:?}", binding.program);
            return;
        };
        let Some(vbo) = self.buffers.get(buffer.0 as usize) else {
            log::warn!("WgpuRasterizer: submit from unknown {buffer:?}");
            return;
        };
        let texture = match binding.texture {
            Some(id) => match self.textures.get(id.0 as usize) {
                Some(t) => t,
                None => {
                    log::warn!("WgpuRasterizer: submit with unknown {id:?}");
                    return;
                }
            },
            None => &self.white,
        };

        let byte_len = vertex_count as u64 * std::mem::size_of::<Vertex>() as u64;
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("nanodraw flush"),
        });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("nanodraw batch pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(program.pipeline(binding.topology));
            rpass.set_bind_group(0, &program.globals_bind_group, &[]);
            rpass.set_bind_group(1, &texture.bind_group, &[]);
            rpass.set_vertex_buffer(0, vbo.slice(..byte_len));
            rpass.draw(0..vertex_count, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));
    }

    fn end_frame(&mut self) {
        // A frame with no draws still owes its clear.
        if self.clear_pending && self.has_target_or_warn() {
            let load = self.load_op();
            if let Some(view) = self.target.as_ref() {
                let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("nanodraw clear"),
                });
                // The pass only needs to exist; its load op does the work.
                drop(encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("nanodraw clear pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                    multiview_mask: None,
                }));
                self.queue.submit(Some(encoder.finish()));
            }
        }
        self.clear_pending = false;
    }
}

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Uint32,    // tag
        1 => Float32x2, // position
        2 => Float32x4, // color
        3 => Float32x2  // uv
    ];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRS,
    }
}

/// Parses and validates WGSL so build errors surface at creation time
/// instead of as an uncaptured device error on first use.
fn validate_wgsl(label: &str, source: &str) -> Result<(), DrawError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| DrawError::ProgramBuild {
        label: label.to_owned(),
        message: e.emit_to_string(source),
    })?;

    naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::empty())
        .validate(&module)
        .map_err(|e| DrawError::ProgramBuild {
            label: label.to_owned(),
            message: e.to_string(),
        })?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn upload_coverage(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    width: u32,
    height: u32,
    pixels: &[u8],
    label: &str,
) -> GpuTexture {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::R8Unorm,
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
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width),
            rows_per_image: Some(height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    GpuTexture {
        _texture: texture,
        bind_group,
    }
}

async fn request_headless_device() -> Result<(wgpu::Device, wgpu::Queue), DrawError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .map_err(|e| DrawError::Resource(format!("no suitable GPU adapter: {e}")))?;

    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("nanodraw device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .map_err(|e| DrawError::Resource(format!("failed to create wgpu device/queue: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_program_validates() {
        let src = ProgramSource::GENERAL;
        assert!(validate_wgsl(src.label, src.vertex).is_ok());
    }

    #[test]
    fn broken_wgsl_is_a_build_error() {
        let err = validate_wgsl("broken", "fn vs_main( {").unwrap_err();
        match err {
            DrawError::ProgramBuild { label, message } => {
                assert_eq!(label, "broken");
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn vertex_layout_matches_vertex_size() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, 36);
        assert_eq!(layout.attributes.len(), 4);
        assert_eq!(layout.attributes[3].offset, 28);
    }
}
