use crate::display_list::{Command, DisplayList, Viewport};
use crate::error::{PaintError, Result};
use crate::scene::*;

/// Records draw commands into a [`DisplayList`] for the host's backend.
pub struct Painter {
    list: DisplayList,
    transform_stack: Vec<Transform2D>,
    clip_depth: usize,
    layer_depth: usize,
}

impl Painter {
    pub fn begin_frame(viewport: Viewport) -> Self {
        Self {
            list: DisplayList {
                viewport,
                commands: Vec::new(),
            },
            transform_stack: vec![Transform2D::identity()],
            clip_depth: 0,
            layer_depth: 0,
        }
    }

    pub fn current_transform(&self) -> Transform2D {
        self.transform_stack.last().copied().unwrap_or_default()
    }

    pub fn push_transform(&mut self, t: Transform2D) {
        // Compose with current transform so nested pushes multiply.
        let composed = self.current_transform().concat(t);
        self.list.commands.push(Command::PushTransform(composed));
        self.transform_stack.push(composed);
    }

    pub fn pop_transform(&mut self) -> Result<()> {
        if self.transform_stack.len() <= 1 {
            return Err(PaintError::Unbalanced("transform"));
        }
        self.list.commands.push(Command::PopTransform);
        let _ = self.transform_stack.pop();
        Ok(())
    }

    pub fn push_clip_rect(&mut self, rect: Rect) {
        self.clip_depth += 1;
        self.list.commands.push(Command::PushClip(ClipRect(rect)));
    }

    pub fn pop_clip(&mut self) -> Result<()> {
        if self.clip_depth == 0 {
            return Err(PaintError::Unbalanced("clip"));
        }
        self.clip_depth -= 1;
        self.list.commands.push(Command::PopClip);
        Ok(())
    }

    pub fn push_layer(&mut self, blend: BlendMode) {
        self.layer_depth += 1;
        self.list.commands.push(Command::PushLayer { blend });
    }

    pub fn pop_layer(&mut self) -> Result<()> {
        if self.layer_depth == 0 {
            return Err(PaintError::Unbalanced("layer"));
        }
        self.layer_depth -= 1;
        self.list.commands.push(Command::PopLayer);
        Ok(())
    }

    pub fn rect(&mut self, rect: Rect, brush: Brush, z: i32) {
        let t = self.current_transform();
        self.list.commands.push(Command::DrawRect {
            rect,
            brush,
            z,
            transform: t,
        });
    }

    pub fn rounded_rect(&mut self, rrect: RoundedRect, brush: Brush, z: i32) {
        let t = self.current_transform();
        self.list.commands.push(Command::DrawRoundedRect {
            rrect,
            brush,
            z,
            transform: t,
        });
    }

    pub fn ellipse(&mut self, center: [f32; 2], radii: [f32; 2], brush: Brush, z: i32) {
        let t = self.current_transform();
        self.list.commands.push(Command::DrawEllipse {
            center,
            radii,
            brush,
            z,
            transform: t,
        });
    }

    pub fn circle(&mut self, center: [f32; 2], radius: f32, brush: Brush, z: i32) {
        self.ellipse(center, [radius, radius], brush, z);
    }

    /// Finish recording. Fails if any clip or layer is still open.
    pub fn finish(self) -> Result<DisplayList> {
        if self.layer_depth > 0 {
            return Err(PaintError::Unbalanced("layer"));
        }
        if self.clip_depth > 0 {
            return Err(PaintError::Unbalanced("clip"));
        }
        Ok(self.list)
    }
}
