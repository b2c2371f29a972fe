//! Column label textures
//!
//! The render layer owns the drawing surface; the engine only asks for a
//! label image through [`LabelProvider`] and caches the handle per column.

use super::ColumnSnapshot;

/// Something that can turn text into a texture handle
pub trait LabelProvider {
    type Image;

    fn render_text(&mut self, title: &str, subtitle: Option<&str>) -> Self::Image;
}

/// Per-column label cache; re-renders only when a percentage changes
pub struct ColumnLabels<P: LabelProvider> {
    provider: P,
    rendered: Vec<Option<(u8, P::Image)>>,
}

impl<P: LabelProvider> ColumnLabels<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            rendered: Vec::new(),
        }
    }

    /// Bring labels in line with `columns`; returns the columns redrawn
    pub fn update(&mut self, columns: &[ColumnSnapshot]) -> Vec<usize> {
        if self.rendered.len() != columns.len() {
            self.rendered = columns.iter().map(|_| None).collect();
        }
        let mut redrawn = Vec::new();
        for (i, column) in columns.iter().enumerate() {
            let pct = column.completion.percentage;
            if matches!(&self.rendered[i], Some((shown, _)) if *shown == pct) {
                continue;
            }
            let subtitle = format!("{pct}%");
            let image = self.provider.render_text(column.label, Some(&subtitle));
            self.rendered[i] = Some((pct, image));
            redrawn.push(i);
        }
        redrawn
    }

    pub fn image(&self, column: usize) -> Option<&P::Image> {
        self.rendered.get(column)?.as_ref().map(|(_, image)| image)
    }

    /// Force a full redraw next update (new level, surface lost)
    pub fn invalidate(&mut self) {
        self.rendered.clear();
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

/// Plain-text labels for headless runs
#[derive(Debug, Default)]
pub struct TextLabels {
    pub drawn: usize,
}

impl LabelProvider for TextLabels {
    type Image = String;

    fn render_text(&mut self, title: &str, subtitle: Option<&str>) -> String {
        self.drawn += 1;
        match subtitle {
            Some(sub) => format!("{title} {sub}"),
            None => title.to_string(),
        }
    }
}
