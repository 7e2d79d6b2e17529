//! Distance labels painted over the viewport

use tape_core::LabelLayer;

const LABEL_FONT_SIZE: f32 = 14.0;
const LABEL_PADDING: egui::Vec2 = egui::vec2(6.0, 3.0);

/// Paint every visible label at its projected position.
///
/// Positions are relative to `rect.min`. Returns the number painted.
pub fn paint_labels(ui: &egui::Ui, rect: egui::Rect, labels: &LabelLayer) -> usize {
    let painter = ui.painter_at(rect);
    let font = egui::FontId::proportional(LABEL_FONT_SIZE);
    let mut painted = 0;

    for label in labels.visible() {
        let Some(position) = label.screen_position else {
            continue;
        };
        let center = rect.min + egui::vec2(position.x, position.y);

        let galley = painter.layout_no_wrap(label.text.clone(), font.clone(), egui::Color32::WHITE);
        let background = egui::Rect::from_center_size(center, galley.size() + LABEL_PADDING * 2.0);

        painter.rect_filled(background, 4.0, egui::Color32::from_black_alpha(180));
        painter.galley(background.min + LABEL_PADDING, galley, egui::Color32::WHITE);
        painted += 1;
    }

    painted
}
