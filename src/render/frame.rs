use crate::core::SizeObservation;
use crate::error::{MountError, MountResult};
use crate::render::{LinePrimitive, RectPrimitive, TextPrimitive};

/// Everything one widget construction presents to its container.
///
/// A recreated widget replaces the whole frame; frames are never patched.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub size: SizeObservation,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(size: SizeObservation) -> Self {
        Self {
            size,
            lines: Vec::new(),
            rects: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    pub fn validate(&self) -> MountResult<()> {
        if !self.size.is_valid() {
            return Err(MountError::InvalidSize {
                width: self.size.width,
                height: self.size.height,
            });
        }

        for line in &self.lines {
            line.validate()?;
        }
        for rect in &self.rects {
            rect.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.rects.is_empty() && self.texts.is_empty()
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.lines.len() + self.rects.len() + self.texts.len()
    }
}
