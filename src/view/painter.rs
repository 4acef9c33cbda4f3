use wgpu::{
    Color, CommandEncoderDescriptor, LoadOp, Operations, RenderPassColorAttachment, RenderPassDescriptor, StoreOp,
    SurfaceError, TextureViewDescriptor,
};

use crate::view::gpu_init::GpuContext;

/// Clear colour behind the egui layers, matches the top of the sky
const CLEAR: Color = Color {
    r: 0.53,
    g: 0.81,
    b: 0.92,
    a: 1.0,
};

/// Presents tessellated egui output on the surface
pub struct FramePainter {
    egui_renderer: egui_wgpu::Renderer,
}

impl FramePainter {
    pub fn new(gpu: &GpuContext) -> Self {
        Self {
            egui_renderer: egui_wgpu::Renderer::new(&gpu.device, gpu.format, egui_wgpu::RendererOptions::default()),
        }
    }

    /// Tessellate `output` and present it. A lost or outdated surface is
    /// reconfigured once before giving up on the frame.
    pub fn paint(
        &mut self,
        gpu: &GpuContext,
        ctx: &egui::Context,
        output: egui::FullOutput,
        pixels_per_point: f32,
    ) -> Result<(), SurfaceError> {
        let frame = match gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                gpu.reconfigure();
                gpu.surface.get_current_texture()?
            }
            Err(e) => return Err(e),
        };

        let primitives = ctx.tessellate(output.shapes, pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point,
        };

        let view = frame.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = gpu.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("frame_encoder"),
        });

        for (id, image_delta) in &output.textures_delta.set {
            self.egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        self.egui_renderer
            .update_buffers(&gpu.device, &gpu.queue, &mut encoder, &primitives, &screen_descriptor);

        {
            let pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("egui_render_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(CLEAR),
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer
                .render(&mut pass.forget_lifetime(), &primitives, &screen_descriptor);
        }

        for id in &output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
