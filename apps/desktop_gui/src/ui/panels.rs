use std::collections::HashMap;

use client_core::render::{ImageRef, ResultView};
use eframe::egui;
use url::Url;

use crate::controller::events::PreviewImage;

/// Load state of one result image, keyed by its display URL.
pub enum ImageSlot {
    Loading,
    Decoded(PreviewImage),
    Ready {
        texture: egui::TextureHandle,
        size: egui::Vec2,
    },
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerSeverity {
    Info,
    Error,
}

pub fn show_banner(ui: &mut egui::Ui, severity: BannerSeverity, message: &str) {
    let (fill, stroke) = match severity {
        BannerSeverity::Error => (
            egui::Color32::from_rgb(111, 53, 53),
            egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
        ),
        BannerSeverity::Info => (
            egui::Color32::from_rgb(38, 74, 99),
            egui::Stroke::new(1.0, egui::Color32::from_rgb(92, 148, 186)),
        ),
    };

    egui::Frame::NONE
        .fill(fill)
        .stroke(stroke)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(10, 8))
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                if severity == BannerSeverity::Info {
                    ui.spinner();
                }
                ui.label(egui::RichText::new(message).color(egui::Color32::WHITE));
            });
        });
}

/// Draws the three summary cards and both images. Returns true when the
/// user asked to copy the summary.
pub fn show_result(
    ui: &mut egui::Ui,
    result: &ResultView,
    images: &mut HashMap<Url, ImageSlot>,
) -> bool {
    ui.columns(result.panels.len(), |columns| {
        for (column, panel) in columns.iter_mut().zip(result.panels.iter()) {
            egui::Frame::group(column.style())
                .corner_radius(10.0)
                .inner_margin(egui::Margin::symmetric(12, 10))
                .show(column, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(egui::RichText::new(panel.title).strong());
                        ui.separator();
                        ui.label(egui::RichText::new(&panel.value).size(22.0));
                    });
                });
        }
    });

    ui.add_space(6.0);
    let copy_requested = ui.button("Copy summary").clicked();

    ui.add_space(10.0);
    show_image(ui, &result.initial_image, images.get_mut(&result.initial_image.url));
    ui.add_space(10.0);
    show_image(
        ui,
        &result.processed_image,
        images.get_mut(&result.processed_image.url),
    );

    copy_requested
}

fn show_image(ui: &mut egui::Ui, image: &ImageRef, slot: Option<&mut ImageSlot>) {
    ui.heading(image.caption);
    match slot {
        Some(slot) => {
            let uploaded = match &*slot {
                ImageSlot::Decoded(preview) => {
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [preview.width, preview.height],
                        &preview.rgba,
                    );
                    let size = egui::vec2(preview.width as f32, preview.height as f32);
                    let texture = ui.ctx().load_texture(
                        format!("result-image:{}", image.url),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    );
                    Some((texture, size))
                }
                _ => None,
            };
            if let Some((texture, size)) = uploaded {
                *slot = ImageSlot::Ready { texture, size };
            }
            match &*slot {
                ImageSlot::Ready { texture, size } => {
                    let scale = (ui.available_width().min(900.0) / size.x).min(1.0);
                    ui.add(egui::Image::new((texture.id(), *size * scale)))
                        .on_hover_text(image.alt);
                }
                ImageSlot::Loading | ImageSlot::Decoded(_) => {
                    ui.spinner();
                }
                ImageSlot::Failed(err) => {
                    ui.weak(format!("{} could not be loaded: {err}", image.alt));
                }
            }
        }
        None => {
            ui.spinner();
        }
    }
    ui.hyperlink_to(image.url.as_str(), image.url.as_str());
}

/// Plain-text summary placed on the clipboard.
pub fn summary_text(result: &ResultView) -> String {
    let mut lines: Vec<String> = result
        .panels
        .iter()
        .map(|panel| format!("{}: {}", panel.title, panel.value))
        .collect();
    lines.push(format!(
        "{} {}",
        result.initial_image.caption, result.initial_image.url
    ));
    lines.push(format!(
        "{} {}",
        result.processed_image.caption, result.processed_image.url
    ));
    lines.join("\n")
}
