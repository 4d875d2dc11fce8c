use crate::image_identifier::core::{ImageRef, Msg};
use crate::image_identifier::headless::select_image;
use crate::image_identifier::main::ImageIdentifier;
use crate::image_identifier::render::{
    render, MainScreen, Screen, BEST_GUESS, HEADER, LOADING,
};
use crate::image_loader::interface::Frame;
use eframe::egui;
use std::collections::HashMap;
use std::sync::Arc;

const MAX_TEXTURE_SIDE: u32 = 1024;
const PREVIEW_SIZE: f32 = 360.0;
const THUMBNAIL_SIZE: f32 = 72.0;
const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff", "ico"];

pub struct GuiApp {
    identifier: ImageIdentifier,
    textures: HashMap<ImageRef, egui::TextureHandle>,
}

impl GuiApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        identifier: ImageIdentifier,
        images: &[String],
    ) -> Self {
        let ctx = cc.egui_ctx.clone();
        let identifier = identifier.with_waker(Arc::new(move || ctx.request_repaint()));
        identifier.start();

        for image in images {
            identifier.dispatch(select_image(image));
        }

        Self {
            identifier,
            textures: HashMap::new(),
        }
    }

    fn texture_for(
        &mut self,
        ctx: &egui::Context,
        image_ref: &ImageRef,
        frame: &Frame,
    ) -> egui::TextureHandle {
        self.textures
            .entry(image_ref.clone())
            .or_insert_with(|| {
                let image = frame.image();
                let rgba = if image.width() > MAX_TEXTURE_SIDE || image.height() > MAX_TEXTURE_SIDE
                {
                    image.thumbnail(MAX_TEXTURE_SIDE, MAX_TEXTURE_SIDE).to_rgba8()
                } else {
                    image.to_rgba8()
                };
                let size = [rgba.width() as usize, rgba.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
                ctx.load_texture(image_ref.to_string(), color_image, Default::default())
            })
            .clone()
    }

    fn input_ui(&mut self, ui: &mut egui::Ui, screen: &MainScreen) {
        ui.horizontal(|ui| {
            if ui.button("Upload Image").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("image", &IMAGE_EXTENSIONS[..])
                    .pick_file()
                {
                    self.identifier.dispatch(Msg::FileChosen(Some(path)));
                }
            }

            ui.label("OR");

            let mut url = screen.url_input.clone();
            let response = ui.add(
                egui::TextEdit::singleline(&mut url)
                    .hint_text("Paste image URL")
                    .desired_width(f32::INFINITY),
            );
            if response.changed() {
                self.identifier.dispatch(Msg::UrlInputChanged(url));
            }
        });
    }

    fn content_ui(&mut self, ui: &mut egui::Ui, screen: &MainScreen) {
        if let (Some(image_ref), Some(frame)) = (&screen.active_image, &screen.preview) {
            let texture = self.texture_for(ui.ctx(), image_ref, frame);
            ui.add(
                egui::Image::new((texture.id(), texture.size_vec2()))
                    .max_size(egui::vec2(PREVIEW_SIZE, PREVIEW_SIZE)),
            );
        } else if let Some(image_ref) = &screen.active_image {
            if screen.error.is_none() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(format!("Loading {}", image_ref));
                });
            }
        }

        if let Some(error) = &screen.error {
            ui.colored_label(egui::Color32::from_rgb(200, 40, 40), error);
        }

        for row in &screen.results {
            ui.horizontal(|ui| {
                ui.strong(&row.label);
                ui.label(&row.confidence);
                if row.best_guess {
                    ui.colored_label(egui::Color32::from_rgb(40, 140, 60), BEST_GUESS);
                }
            });
        }

        if screen.show_identify {
            let label = if screen.busy {
                "Identifying..."
            } else {
                "Identify Image"
            };
            if ui
                .add_enabled(!screen.busy, egui::Button::new(label))
                .clicked()
            {
                self.identifier.dispatch(Msg::IdentifyClicked);
            }
        }
    }

    fn history_ui(&mut self, ui: &mut egui::Ui, screen: &MainScreen) {
        if screen.history.is_empty() {
            return;
        }

        ui.separator();
        ui.heading("Recent Images");
        ui.horizontal_wrapped(|ui| {
            for image_ref in &screen.history {
                let clicked = match self.textures.get(image_ref) {
                    Some(texture) => ui
                        .add(egui::ImageButton::new(
                            egui::Image::new((texture.id(), texture.size_vec2()))
                                .max_size(egui::vec2(THUMBNAIL_SIZE, THUMBNAIL_SIZE)),
                        ))
                        .on_hover_text(image_ref.to_string())
                        .clicked(),
                    None => ui.button(image_ref.to_string()).clicked(),
                };

                if clicked {
                    self.identifier
                        .dispatch(Msg::HistorySelected(image_ref.clone()));
                }
            }
        });
    }
}

impl eframe::App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.identifier.poll();
        let screen = render(&self.identifier.snapshot());

        egui::CentralPanel::default().show(ctx, |ui| match &screen {
            Screen::Loading => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.heading(LOADING);
                    ui.spinner();
                });
            }
            Screen::Main(main) => {
                ui.heading(HEADER);
                if let Some(notice) = &main.model_notice {
                    ui.colored_label(egui::Color32::from_rgb(200, 120, 0), notice);
                }
                self.input_ui(ui, main);
                ui.separator();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.content_ui(ui, main);
                    self.history_ui(ui, main);
                });
            }
        });
    }
}
