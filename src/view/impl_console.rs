use crate::image_identifier::render::{MainScreen, Screen, BEST_GUESS, HEADER, LOADING};
use crate::view::interface::View;
use std::error::Error;
use std::io::Write;

pub struct ViewConsole<W: Write> {
    out: W,
}

impl ViewConsole<std::io::Stdout> {
    pub fn new() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write> ViewConsole<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> View for ViewConsole<W> {
    fn show(&mut self, screen: &Screen) -> Result<(), Box<dyn Error + Send + Sync>> {
        for line in to_lines(screen) {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

pub fn to_lines(screen: &Screen) -> Vec<String> {
    match screen {
        Screen::Loading => vec![LOADING.to_string()],
        Screen::Main(main) => main_lines(main),
    }
}

fn main_lines(main: &MainScreen) -> Vec<String> {
    let mut lines = vec![format!("== {} ==", HEADER)];

    if let Some(notice) = &main.model_notice {
        lines.push(notice.clone());
    }
    if let Some(image) = &main.active_image {
        let size = main
            .preview
            .as_ref()
            .map(|frame| format!(" ({}x{})", frame.width(), frame.height()))
            .unwrap_or_default();
        lines.push(format!("Image: {}{}", image, size));
    }
    if let Some(error) = &main.error {
        lines.push(error.clone());
    }
    for row in &main.results {
        let best = if row.best_guess {
            format!(" [{}]", BEST_GUESS)
        } else {
            String::new()
        };
        lines.push(format!("  {}  {}{}", row.label, row.confidence, best));
    }
    if !main.history.is_empty() {
        let recent: Vec<String> = main.history.iter().map(ToString::to_string).collect();
        lines.push(format!("Recent Images: {}", recent.join(", ")));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_identifier::core::ImageRef;
    use crate::image_identifier::render::ResultRow;

    #[test]
    fn test_main_screen_lines() {
        let screen = Screen::Main(MainScreen {
            url_input: String::new(),
            active_image: Some(ImageRef::Url("a.png".to_string())),
            preview: None,
            error: None,
            model_notice: None,
            results: vec![ResultRow {
                label: "cat".to_string(),
                confidence: "Confidence level: 92.00%".to_string(),
                best_guess: true,
            }],
            show_identify: true,
            busy: false,
            history: vec![ImageRef::Url("a.png".to_string())],
        });

        let mut view = ViewConsole::with_writer(Vec::new());
        view.show(&screen).unwrap();
        let printed = String::from_utf8(view.into_inner()).unwrap();

        assert_eq!(
            printed,
            "== Image Identification ==\n\
             Image: a.png\n  \
             cat  Confidence level: 92.00% [Best Guess]\n\
             Recent Images: a.png\n"
        );
    }

    #[test]
    fn test_loading_screen_lines() {
        assert_eq!(to_lines(&Screen::Loading), vec!["Model Loading...".to_string()]);
    }
}
