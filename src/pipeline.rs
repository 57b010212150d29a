// One tick's worth of image work: white-balance fix, then the round crop.

use crate::compositor::CircularCompositor;
use crate::config::ClaheParams;
use crate::correct::ColorCorrector;
use crate::types::{Frame, FrameBuffer};

pub struct FramePipeline {
    corrector: ColorCorrector,
    compositor: CircularCompositor,
}

impl FramePipeline {
    pub fn new(clahe: ClaheParams) -> Self {
        Self { corrector: ColorCorrector::new(clahe), compositor: CircularCompositor::new() }
    }

    pub fn process(&mut self, frame: &Frame) -> FrameBuffer {
        let corrected = self.corrector.correct(frame);
        self.compositor.composite(&corrected)
    }
}
