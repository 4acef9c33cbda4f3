use egui::{Color32, Context, LayerId, RichText, Stroke};

use crate::controller::{Intent, Session};
use crate::model::world::PLACEABLE;
use crate::model::GameMode;
use crate::view::{IsoRenderer, RenderScene};

/// Paint the world on the background layer and the HUD on top.
/// Returns the egui output and any intents raised by HUD buttons.
pub fn build_ui(
    egui_ctx: &Context,
    raw_input: egui::RawInput,
    session: &Session,
    renderer: &mut IsoRenderer,
) -> (egui::FullOutput, Vec<Intent>) {
    let mut intents = Vec::new();

    let output = egui_ctx.run(raw_input, |ctx| {
        let frame = renderer.render(RenderScene::from(session), ctx.available_rect());
        ctx.layer_painter(LayerId::background()).extend(frame.shapes);

        draw_status_window(ctx, session, &mut intents);
        draw_hotbar(ctx, session, &mut intents);
    });

    (output, intents)
}

fn mode_badge(mode: GameMode) -> RichText {
    let color = match mode {
        GameMode::Survival => Color32::from_rgb(0xF8, 0x71, 0x71),
        GameMode::Creative => Color32::from_rgb(0x60, 0xA5, 0xFA),
    };
    RichText::new(mode.to_string().to_uppercase()).color(color).strong()
}

fn draw_status_window(ctx: &Context, session: &Session, intents: &mut Vec<Intent>) {
    let pos = session.player().pos;

    egui::Window::new("World")
        .default_pos([8.0, 8.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(mode_badge(session.mode()));
                if ui.small_button("Toggle").clicked() {
                    intents.push(Intent::ToggleMode);
                }
            });
            ui.label(RichText::new(format!("Pos: x: {} y: {} z: {}", pos.0, pos.1, pos.2)).small());
            ui.label(RichText::new(format!("Blocks: {}", session.world().len())).small());
            if let Some(seed) = session.seed() {
                ui.label(RichText::new(format!("Seed: {}", seed)).small());
            }
            ui.label(
                RichText::new(format!("Yaw: {:.0}°  Zoom: {:.0}", session.camera().yaw.to_degrees(), session.camera().distance))
                    .small(),
            );

            match (session.interaction().target(), session.interaction().progress()) {
                (Some(target), Some(progress)) => {
                    let kind = session.world().get(&target).map_or("?", |b| b.kind.name());
                    ui.label(RichText::new(format!("Breaking {} at {:?}", kind, target)).small());
                    ui.add(egui::ProgressBar::new(progress as f32 / 100.0).desired_width(120.0));
                }
                _ => {
                    ui.label(RichText::new("No target").small().weak());
                }
            }

            ui.separator();
            ui.label(RichText::new("WASD / arrows - Move").small());
            ui.label(RichText::new("Space - Jump").small());
            ui.label(RichText::new("F / left click - Break").small());
            ui.label(RichText::new("E / right click - Place (creative)").small());
            ui.label(RichText::new("Q / R - Rotate   + / - - Zoom").small());
            ui.label(RichText::new("M - Mode   1-6 - Block   N - New world").small());

            if ui.button("New world").clicked() {
                intents.push(Intent::NewWorld);
            }
        });
}

fn draw_hotbar(ctx: &Context, session: &Session, intents: &mut Vec<Intent>) {
    egui::Area::new(egui::Id::new("hotbar"))
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -8.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for (slot, kind) in PLACEABLE.iter().enumerate() {
                    let is_selected = session.selected() == *kind;
                    let [r, g, b] = kind.base_rgb();
                    let size = if is_selected { 44.0 } else { 38.0 };
                    let stroke = if is_selected {
                        Stroke::new(2.0, Color32::YELLOW)
                    } else {
                        Stroke::new(0.5, Color32::BLACK)
                    };

                    let label = RichText::new(format!("{}", slot + 1)).size(10.0).color(Color32::WHITE);
                    let button = egui::Button::new(label)
                        .fill(Color32::from_rgb(r, g, b))
                        .stroke(stroke)
                        .min_size(egui::vec2(size, size));

                    if ui.add(button).on_hover_text(kind.name()).clicked() {
                        intents.push(Intent::SelectBlock(*kind));
                    }
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::model::WorldStore;

    fn raw_input() -> egui::RawInput {
        egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 600.0))),
            ..Default::default()
        }
    }

    #[test]
    fn test_idle_frame_raises_no_intents() {
        let ctx = Context::default();
        let session = Session::with_world(GameConfig::default(), WorldStore::new());
        let mut renderer = IsoRenderer::with_seed(25.0, 3);

        let (output, intents) = build_ui(&ctx, raw_input(), &session, &mut renderer);
        assert!(intents.is_empty());
        assert!(!output.shapes.is_empty(), "sky, avatar and HUD are always painted");
    }
}
