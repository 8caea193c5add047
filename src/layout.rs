use kurbo::Size;

use crate::error::{GridstageError, GridstageResult};

/// Scale factor that makes `content` cover `stage` on both axes.
///
/// Cover-fit, not contain-fit: whichever axis needs more magnification wins,
/// so the scaled content may overflow the other axis but never underfills.
pub fn cover_scale(content: Size, stage: Size) -> f64 {
    (stage.width / content.width).max(stage.height / content.height)
}

/// Derived sizing for one viewport state.
///
/// `scaled_content` is the inverse-scaled stage size: sizing the unscaled
/// content element to it makes the element exactly fill the stage once the
/// grid is visually scaled up by `content_scale`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StageLayout {
    pub stage: Size,
    pub content_scale: f64,
    pub scaled_content: Size,
}

impl StageLayout {
    pub fn compute(content: Size, stage: Size) -> Self {
        let content_scale = cover_scale(content, stage);
        Self {
            stage,
            content_scale,
            scaled_content: Size::new(stage.width / content_scale, stage.height / content_scale),
        }
    }
}

/// Startup precondition: the natural content rect must have positive area,
/// otherwise every scale below is a division by zero.
pub fn validate_content_rect(content: Size) -> GridstageResult<()> {
    if !(content.width > 0.0 && content.height > 0.0) {
        return Err(GridstageError::validation(format!(
            "content rect must have positive dimensions, got {:.1}x{:.1}",
            content.width, content.height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_scale_takes_the_limiting_axis() {
        let layout = StageLayout::compute(Size::new(400.0, 300.0), Size::new(800.0, 300.0));
        assert_eq!(layout.content_scale, 2.0);
        assert_eq!(layout.scaled_content, Size::new(400.0, 150.0));
    }

    #[test]
    fn scaled_content_inverts_exactly() {
        let content = Size::new(317.0, 241.0);
        for stage in [
            Size::new(1920.0, 1080.0),
            Size::new(640.0, 1136.0),
            Size::new(100.0, 100.0),
        ] {
            let layout = StageLayout::compute(content, stage);
            assert!(layout.content_scale > 0.0);
            assert!((layout.scaled_content.width * layout.content_scale - stage.width).abs() < 1e-9);
            assert!(
                (layout.scaled_content.height * layout.content_scale - stage.height).abs() < 1e-9
            );
            // Cover-fit: the scaled natural rect spans at least the stage.
            assert!(content.width * layout.content_scale >= stage.width - 1e-9);
            assert!(content.height * layout.content_scale >= stage.height - 1e-9);
        }
    }

    #[test]
    fn compute_is_deterministic() {
        let content = Size::new(400.0, 300.0);
        let stage = Size::new(1024.0, 768.0);
        assert_eq!(
            StageLayout::compute(content, stage),
            StageLayout::compute(content, stage)
        );
    }

    #[test]
    fn zero_sized_content_is_rejected() {
        assert!(validate_content_rect(Size::new(0.0, 300.0)).is_err());
        assert!(validate_content_rect(Size::new(400.0, 0.0)).is_err());
        assert!(validate_content_rect(Size::new(400.0, 300.0)).is_ok());
    }
}
