use crate::scene::*;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    DrawRect { rect: Rect, brush: Brush, z: i32, transform: Transform2D },
    DrawRoundedRect { rrect: RoundedRect, brush: Brush, z: i32, transform: Transform2D },
    DrawEllipse { center: [f32; 2], radii: [f32; 2], brush: Brush, z: i32, transform: Transform2D },
    PushClip(ClipRect),
    PopClip,
    PushTransform(Transform2D),
    PopTransform,
    /// Start an offscreen layer; everything until the matching `PopLayer` is
    /// composited onto the layer below with `blend`.
    PushLayer { blend: BlendMode },
    PopLayer,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    pub viewport: Viewport,
    pub commands: Vec<Command>,
}

impl DisplayList {
    /// Number of `PushLayer` commands using `blend`.
    pub fn count_layers(&self, blend: BlendMode) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::PushLayer { blend: b } if *b == blend))
            .count()
    }
}
