//! Scannable code rendering and export.
//!
//! The token is rendered by an external SVG render service, fetched through
//! the shared read retry policy. The fetched document gets its `id`, `width`
//! and `height` attributes normalized so the owning view can address and
//! export it; export writes the SVG next to the session's title and token
//! prefix. Failures here degrade to a visible error state, never a crash.

use std::path::{Path, PathBuf};
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::backend::retry::RetryPolicy;
use crate::config::Config;
use crate::error::AttendanceError;
use crate::format::short_token;

/// Element id stamped onto the fetched document so the view can find it.
pub const EXPORT_ID: &str = "qr-svg-export";

static SVG_OPEN_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<svg([^>]*)>").expect("svg tag pattern is valid"));

pub struct CodeRenderer {
    client: reqwest::Client,
    render_url: String,
    size: u32,
    margin: u32,
}

impl CodeRenderer {
    pub fn new(config: &Config) -> Result<Self, AttendanceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(CodeRenderer {
            client,
            render_url: config.code_render_url.trim_end_matches('/').to_string(),
            size: 256,
            margin: 2,
        })
    }

    /// Fetch the token's scannable code as a normalized SVG document.
    pub async fn fetch_svg(&self, token: &str) -> Result<String, AttendanceError> {
        if token.is_empty() {
            return Err(AttendanceError::Render("no token to render".to_string()));
        }

        let url = format!(
            "{}?size={size}x{size}&margin={margin}&data={data}&format=svg",
            self.render_url,
            size = self.size,
            margin = self.margin,
            data = urlencoding::encode(token),
        );

        let body = RetryPolicy::read()
            .run(|| async {
                let response = self.client.get(&url).send().await?;
                let status = response.status().as_u16();
                let text = response.text().await?;
                if !(200..300).contains(&status) {
                    return Err(AttendanceError::Server {
                        status,
                        message: format!("Server error (Status: {})", status),
                    });
                }
                Ok(text)
            })
            .await
            .map_err(|e| AttendanceError::Render(e.to_string()))?;

        if !looks_like_svg(&body) {
            return Err(AttendanceError::Render(
                "response is not an SVG document".to_string(),
            ));
        }

        Ok(normalize_svg(&body, self.size))
    }

    /// Write an already-fetched SVG to `dir`, named after the session title
    /// and token prefix.
    pub fn export(
        &self,
        svg: &str,
        title: &str,
        token: &str,
        dir: &Path,
    ) -> Result<PathBuf, AttendanceError> {
        let path = dir.join(format!(
            "{}_{}_QR.svg",
            sanitize_component(title),
            short_token(token)
        ));
        std::fs::write(&path, svg)
            .map_err(|e| AttendanceError::Render(format!("could not write {:?}: {}", path, e)))?;
        log::debug!("[QR] exported code image to {:?}", path);
        Ok(path)
    }
}

fn looks_like_svg(body: &str) -> bool {
    body.contains("<svg")
}

/// Stamp the export id onto the opening `<svg>` tag and make sure it carries
/// explicit width/height, leaving any existing attributes alone.
fn normalize_svg(svg: &str, size: u32) -> String {
    SVG_OPEN_TAG
        .replace(svg, |caps: &regex::Captures| {
            let mut attrs = caps[1].to_string();
            if !has_attr(&attrs, "id") {
                attrs.push_str(&format!(r#" id="{}""#, EXPORT_ID));
            }
            if !has_attr(&attrs, "width") {
                attrs.push_str(&format!(r#" width="{}""#, size));
            }
            if !has_attr(&attrs, "height") {
                attrs.push_str(&format!(r#" height="{}""#, size));
            }
            format!("<svg{}>", attrs)
        })
        .to_string()
}

/// True when the attribute list already carries `name=` as a whole attribute.
/// A substring check would mistake `stroke-width=` for `width=`.
fn has_attr(attrs: &str, name: &str) -> bool {
    let needle = format!("{}=", name);
    let mut start = 0;
    while let Some(pos) = attrs[start..].find(&needle) {
        let abs = start + pos;
        if attrs[..abs]
            .chars()
            .next_back()
            .map_or(true, |c| c.is_whitespace())
        {
            return true;
        }
        start = abs + needle.len();
    }
    false
}

fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else if c == ' ' {
                '_'
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_missing_attributes() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 33 33"><rect/></svg>"#;
        let fixed = normalize_svg(svg, 256);
        assert!(fixed.contains(r#"id="qr-svg-export""#));
        assert!(fixed.contains(r#"width="256""#));
        assert!(fixed.contains(r#"height="256""#));
        // Only the opening tag is touched.
        assert!(fixed.ends_with("<rect/></svg>"));
    }

    #[test]
    fn test_normalize_keeps_existing_dimensions() {
        let svg = r#"<svg width="128" height="128"><rect/></svg>"#;
        let fixed = normalize_svg(svg, 256);
        assert!(fixed.contains(r#"width="128""#));
        assert!(!fixed.contains(r#"width="256""#));
        assert!(fixed.contains(r#"id="qr-svg-export""#));
    }

    #[test]
    fn test_normalize_sizes_despite_stroke_width_attribute() {
        // `stroke-width=` must not count as an explicit `width=`.
        let svg = r#"<svg stroke-width="2" viewBox="0 0 33 33"><path/></svg>"#;
        let fixed = normalize_svg(svg, 256);
        assert!(fixed.contains(r#"width="256""#));
        assert!(fixed.contains(r#"height="256""#));
        assert!(fixed.contains(r#"stroke-width="2""#));
    }

    #[test]
    fn test_svg_detection() {
        assert!(looks_like_svg(r#"<?xml version="1.0"?><svg></svg>"#));
        assert!(!looks_like_svg("<html>not a code</html>"));
    }

    #[test]
    fn test_export_writes_named_file() {
        let config = Config {
            backend_url: "http://localhost:8080/api".to_string(),
            user_id: String::new(),
            http_timeout_secs: 30,
            code_render_url: "https://render.example/create".to_string(),
        };
        let renderer = CodeRenderer::new(&config).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let path = renderer
            .export(
                r#"<svg id="qr-svg-export"></svg>"#,
                "Physics Lecture 3",
                "55f1ab2c-9d71-4f02",
                dir.path(),
            )
            .unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "Physics_Lecture_3_55f1ab2c_QR.svg"
        );
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("qr-svg-export"));
    }

    #[tokio::test]
    async fn test_empty_token_fails_before_any_fetch() {
        let config = Config {
            backend_url: "http://localhost:8080/api".to_string(),
            user_id: String::new(),
            http_timeout_secs: 30,
            code_render_url: "https://render.example/create".to_string(),
        };
        let renderer = CodeRenderer::new(&config).unwrap();
        assert!(matches!(
            renderer.fetch_svg("").await,
            Err(AttendanceError::Render(_))
        ));
    }
}
