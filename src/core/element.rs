//! Decorative element descriptors and the built-in logo set.

use std::path::{Path, PathBuf};

/// Percentage offset of an element's box from the centre of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset2 {
    pub x: f64,
    pub y: f64,
}

/// A static background element.  Never mutated after startup.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorativeElement {
    pub id: String,
    pub label: String,
    /// Image file (PNG, JPEG, WebP, …).
    pub src: PathBuf,
    /// Box edge length in device pixels.
    pub scale: f64,
    pub position: Offset2,
    /// Base rotation in degrees (clockwise).
    pub rotation: f64,
    /// Priority elements enter earlier and stay brighter.
    pub priority: bool,
}

impl DecorativeElement {
    /// Up to two uppercase initials of the label, for placeholders.
    pub fn initials(&self) -> String {
        self.label
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter_map(|w| w.chars().next())
            .filter(|c| c.is_alphanumeric())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Lowercase, dash-separated identifier derived from free text.
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

// (label, file, scale, x, y, rotation, priority)
const DEFAULT_LOGOS: &[(&str, &str, f64, f64, f64, f64, bool)] = &[
    ("Google Cloud", "google-cloud.png", 280.0, -25.0, -15.0, 0.0, true),
    ("Kubernetes", "kubernetes.png", 280.0, 25.0, -15.0, 0.0, true),
    ("AWS", "aws.png", 280.0, 0.0, 20.0, 0.0, true),
    ("Docker", "docker.png", 260.0, 25.0, -55.0, -15.0, true),
    ("Azure", "azure.png", 240.0, -60.0, -30.0, 20.0, true),
    ("Istio", "istio.png", 220.0, 60.0, -20.0, -25.0, false),
    ("Linux", "linux.png", 250.0, -20.0, 60.0, 10.0, false),
    ("Jenkins", "jenkins.png", 200.0, 55.0, -45.0, -20.0, false),
    ("GitHub", "github.png", 180.0, -55.0, -60.0, 25.0, false),
];

/// The nine cloud / DevOps logos, with image paths under `asset_dir`.
pub fn default_elements(asset_dir: &Path) -> Vec<DecorativeElement> {
    DEFAULT_LOGOS
        .iter()
        .map(|&(label, file, scale, x, y, rotation, priority)| DecorativeElement {
            id: slug(label),
            label: label.to_string(),
            src: asset_dir.join(file),
            scale,
            position: Offset2 { x, y },
            rotation,
            priority,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_matches_layout() {
        let els = default_elements(Path::new("logos"));
        assert_eq!(els.len(), 9);
        assert_eq!(els.iter().filter(|e| e.priority).count(), 5);
        assert_eq!(els[1].id, "kubernetes");
        assert_eq!(els[0].id, "google-cloud");
        assert_eq!(els[3].rotation, -15.0);
        assert_eq!(els[8].src, Path::new("logos").join("github.png"));
    }

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(slug("Google Cloud"), "google-cloud");
        assert_eq!(slug("  C++ / Rust!  "), "c-rust");
        assert_eq!(slug(""), "");
    }

    #[test]
    fn initials_from_label() {
        let mut els = default_elements(Path::new("."));
        assert_eq!(els[0].initials(), "GC");
        assert_eq!(els[2].initials(), "A");
        els[2].label = "amazon web services".into();
        assert_eq!(els[2].initials(), "AW");
    }
}
