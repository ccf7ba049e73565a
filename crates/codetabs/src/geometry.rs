//! Layout geometry.

/// Axis-aligned bounding box in CSS pixels, as reported by layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// This box expressed in the coordinate space of `origin`.
    #[must_use]
    pub fn relative_to(&self, origin: &Rect) -> Rect {
        Rect {
            left: self.left - origin.left,
            top: self.top - origin.top,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_to() {
        let container = Rect::new(100.0, 50.0, 400.0, 40.0);
        let button = Rect::new(172.5, 58.0, 64.0, 24.0);
        assert_eq!(
            button.relative_to(&container),
            Rect::new(72.5, 8.0, 64.0, 24.0)
        );
    }
}
