#![forbid(unsafe_code)]

//! Details view for one card.

use wallet_core::geometry::{Point, Rect};

use crate::card::{CardFace, CardId, CardRecord};
use crate::code_image::CodeImage;

/// Panel size in cells, before clamping to the viewport.
const PANEL: (u16, u16) = (64, 22);

/// Everything the details panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsView {
    pub card: CardId,
    pub title: String,
    /// `"{subtitle} • {holder}"`.
    pub subtitle: String,
    /// Preview face. The preview has no delete affordance.
    pub face: CardFace,
    pub code: CodeImage,
}

impl DetailsView {
    #[must_use]
    pub fn open(record: &CardRecord) -> Self {
        Self {
            card: record.id,
            title: record.title.clone(),
            subtitle: format!("{} • {}", record.subtitle, record.holder),
            face: record.face(),
            code: CodeImage::new(&record.id.to_string()),
        }
    }

    /// The panel, centered in `viewport`. Everything else is backdrop.
    #[must_use]
    pub fn panel_rect(viewport: Rect) -> Rect {
        let width = PANEL.0.min(viewport.width);
        let height = PANEL.1.min(viewport.height);
        Rect::new(
            viewport.x + i32::from((viewport.width - width) / 2),
            viewport.y + i32::from((viewport.height - height) / 2),
            width,
            height,
        )
    }

    /// Whether a press at `point` lands on the backdrop.
    #[must_use]
    pub fn is_backdrop(viewport: Rect, point: Point) -> bool {
        !Self::panel_rect(viewport).contains(point)
    }
}
