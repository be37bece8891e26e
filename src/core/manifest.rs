//! Logo manifest parsing.
//!
//! A manifest is a sequence of `[logo]` sections with `key = value` lines:
//!
//! ```text
//! [logo]
//! label = Kubernetes
//! src = logos/kubernetes.png
//! scale = 280
//! x = 25
//! y = -15
//! rotation = 0
//! priority = true
//! ```
//!
//! Relative `src` paths resolve against the manifest's own directory.

use std::path::Path;

use thiserror::Error;

use super::element::{slug, DecorativeElement, Offset2};

#[derive(Debug, Error, PartialEq)]
pub enum ManifestError {
    #[error("line {line}: `{key}` appears before any [logo] section")]
    KeyOutsideSection { line: usize, key: String },
    #[error("line {line}: invalid value for `{key}`: {value:?}")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },
    #[error("line {line}: unknown section [{name}]")]
    UnknownSection { line: usize, name: String },
    #[error("logo starting at line {line} is missing `{field}`")]
    MissingField { line: usize, field: &'static str },
    #[error("logo starting at line {line} reuses id `{id}`")]
    DuplicateId { line: usize, id: String },
}

#[derive(Default)]
struct Draft {
    line: usize,
    id: Option<String>,
    label: Option<String>,
    src: Option<String>,
    scale: Option<f64>,
    x: f64,
    y: f64,
    rotation: f64,
    priority: bool,
}

impl Draft {
    fn finish(self, base_dir: &Path) -> Result<DecorativeElement, ManifestError> {
        let label = self.label.ok_or(ManifestError::MissingField {
            line: self.line,
            field: "label",
        })?;
        let src = self.src.ok_or(ManifestError::MissingField {
            line: self.line,
            field: "src",
        })?;
        Ok(DecorativeElement {
            id: self.id.unwrap_or_else(|| slug(&label)),
            label,
            src: base_dir.join(src),
            scale: self.scale.unwrap_or(240.0),
            position: Offset2 {
                x: self.x,
                y: self.y,
            },
            rotation: self.rotation,
            priority: self.priority,
        })
    }
}

fn parse_number(line: usize, key: &str, value: &str) -> Result<f64, ManifestError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ManifestError::InvalidValue {
            line,
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn parse_bool(line: usize, key: &str, value: &str) -> Result<bool, ManifestError> {
    match value {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ManifestError::InvalidValue {
            line,
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Parse manifest text.  Relative image paths are joined onto `base_dir`.
pub fn parse_manifest(text: &str, base_dir: &Path) -> Result<Vec<DecorativeElement>, ManifestError> {
    let mut elements = Vec::new();
    let mut current: Option<Draft> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim();
            if name != "logo" {
                return Err(ManifestError::UnknownSection {
                    line: line_no,
                    name: name.to_string(),
                });
            }
            if let Some(draft) = current.take() {
                push_unique(&mut elements, draft, base_dir)?;
            }
            current = Some(Draft {
                line: line_no,
                ..Draft::default()
            });
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            tracing::warn!(line = line_no, "ignoring manifest line without `=`");
            continue;
        };
        let key = key.trim();
        let value = value.trim().trim_matches('"');

        let Some(draft) = current.as_mut() else {
            return Err(ManifestError::KeyOutsideSection {
                line: line_no,
                key: key.to_string(),
            });
        };

        match key {
            "id" => draft.id = Some(value.to_string()),
            "label" | "alt" => draft.label = Some(value.to_string()),
            "src" => draft.src = Some(value.to_string()),
            "scale" => draft.scale = Some(parse_number(line_no, key, value)?.max(1.0)),
            "x" => draft.x = parse_number(line_no, key, value)?,
            "y" => draft.y = parse_number(line_no, key, value)?,
            "rotation" => draft.rotation = parse_number(line_no, key, value)?,
            "priority" => draft.priority = parse_bool(line_no, key, value)?,
            other => tracing::warn!(line = line_no, key = other, "unknown manifest key"),
        }
    }

    if let Some(draft) = current.take() {
        push_unique(&mut elements, draft, base_dir)?;
    }
    Ok(elements)
}

/// Ids key the asset table, so two logos may not share one.
fn push_unique(
    elements: &mut Vec<DecorativeElement>,
    draft: Draft,
    base_dir: &Path,
) -> Result<(), ManifestError> {
    let line = draft.line;
    let element = draft.finish(base_dir)?;
    if elements.iter().any(|e| e.id == element.id) {
        return Err(ManifestError::DuplicateId {
            line,
            id: element.id,
        });
    }
    elements.push(element);
    Ok(())
}

/// Read and parse a manifest file.
pub fn load_manifest(path: &Path) -> anyhow::Result<Vec<DecorativeElement>> {
    use anyhow::Context;

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading logo manifest {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let elements = parse_manifest(&text, base_dir)
        .with_context(|| format!("parsing logo manifest {}", path.display()))?;
    tracing::info!(count = elements.len(), path = %path.display(), "loaded logo manifest");
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    const SAMPLE: &str = r#"
# two logos
[logo]
label = Kubernetes
src = k8s.png
scale = 280
x = 25
y = -15
priority = true

[logo]
id = gh
label = "GitHub"
src = /abs/github.png
rotation = 25
"#;

    #[test]
    fn parses_sections() {
        let els = parse_manifest(SAMPLE, Path::new("assets")).unwrap();
        assert_eq!(els.len(), 2);
        assert_eq!(els[0].id, "kubernetes");
        assert_eq!(els[0].src, PathBuf::from("assets/k8s.png"));
        assert_eq!(els[0].position, Offset2 { x: 25.0, y: -15.0 });
        assert!(els[0].priority);
        assert_eq!(els[1].id, "gh");
        assert_eq!(els[1].label, "GitHub");
        assert_eq!(els[1].src, PathBuf::from("/abs/github.png"));
        assert_eq!(els[1].scale, 240.0);
        assert_eq!(els[1].rotation, 25.0);
        assert!(!els[1].priority);
    }

    #[test]
    fn empty_manifest_is_empty() {
        assert_eq!(parse_manifest("# nothing\n", Path::new(".")), Ok(Vec::new()));
    }

    #[test]
    fn key_before_section() {
        let err = parse_manifest("label = x\n", Path::new(".")).unwrap_err();
        assert_eq!(
            err,
            ManifestError::KeyOutsideSection {
                line: 1,
                key: "label".into()
            }
        );
    }

    #[test]
    fn bad_number_reports_line() {
        let err = parse_manifest("[logo]\nlabel = a\nsrc = a.png\nscale = big\n", Path::new("."))
            .unwrap_err();
        assert!(matches!(err, ManifestError::InvalidValue { line: 4, .. }));
        assert_eq!(err.to_string(), "line 4: invalid value for `scale`: \"big\"");
    }

    #[test]
    fn missing_src() {
        let err = parse_manifest("\n[logo]\nlabel = a\n", Path::new(".")).unwrap_err();
        assert_eq!(
            err,
            ManifestError::MissingField {
                line: 2,
                field: "src"
            }
        );
    }

    #[test]
    fn unknown_section() {
        let err = parse_manifest("[particle]\n", Path::new(".")).unwrap_err();
        assert!(matches!(err, ManifestError::UnknownSection { line: 1, .. }));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let text = "[logo]\nlabel = Cloud\nsrc = a.png\n\n[logo]\nlabel = Cloud\nsrc = b.png\n";
        let err = parse_manifest(text, Path::new(".")).unwrap_err();
        assert_eq!(
            err,
            ManifestError::DuplicateId {
                line: 5,
                id: "cloud".into()
            }
        );

        let text = "[logo]\nid = x\nlabel = One\nsrc = a.png\n[logo]\nid = x\nlabel = Two\nsrc = b.png\n";
        assert!(matches!(
            parse_manifest(text, Path::new(".")),
            Err(ManifestError::DuplicateId { line: 5, .. })
        ));

        // Same label, distinct explicit ids: both kept.
        let text = "[logo]\nid = a\nlabel = Cloud\nsrc = a.png\n[logo]\nid = b\nlabel = Cloud\nsrc = b.png\n";
        assert_eq!(parse_manifest(text, Path::new(".")).unwrap().len(), 2);
    }
}
