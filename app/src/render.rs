//! Presentation of a tax record: an HTML document for rich surfaces and a
//! coloured rendering for the terminal. Both share section order:
//! General Information, Activities, Regime (if present), Tax Compliance
//! Status (if present).

use std::fmt;

use colored::*;
use serde_json::Value;

use crate::error::QueryError;
use crate::models::TaxRecord;

const NO_ACTIVITY: &str = "No registered activity";

const DARK_STYLE: &str = "<style>
.titulo { font-size: 18px; font-weight: bold; color: #fff; }
.dato { font-size: 15px; font-weight: bold; color: #e0e0e0; }
.valor { font-size: 15px; color: #7fffd4; }
.seccion { margin-top: 18px; font-size: 14px; font-weight: bold; color: #00bfff; }
.actividad { background: #222; border-radius: 6px; padding: 8px; margin-bottom: 8px; color: #e0e0e0; }
.label { font-weight: bold; color: #b0b0b0; }
.extra { color: #ffb6c1; font-size: 13px; }
</style>";

const LIGHT_STYLE: &str = "<style>
.titulo { font-size: 18px; font-weight: bold; color: #2c3e50; }
.dato { font-size: 15px; font-weight: bold; color: #34495e; }
.valor { font-size: 15px; color: #16a085; }
.seccion { margin-top: 18px; font-size: 14px; font-weight: bold; color: #2980b9; }
.actividad { background: #f4f8fb; border-radius: 6px; padding: 8px; margin-bottom: 8px; }
.label { font-weight: bold; color: #7f8c8d; }
.extra { color: #8e44ad; font-size: 13px; }
</style>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `RRGGBB`, with or without a leading `#`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn is_dark(&self) -> bool {
        (self.r as u16 + self.g as u16 + self.b as u16) < 384
    }
}

/// Standard xterm values of the 16 ANSI colours.
const ANSI_PALETTE: [Rgb; 16] = [
    Rgb::new(0, 0, 0),
    Rgb::new(205, 0, 0),
    Rgb::new(0, 205, 0),
    Rgb::new(205, 205, 0),
    Rgb::new(0, 0, 238),
    Rgb::new(205, 0, 205),
    Rgb::new(0, 205, 205),
    Rgb::new(229, 229, 229),
    Rgb::new(127, 127, 127),
    Rgb::new(255, 0, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(255, 255, 0),
    Rgb::new(92, 92, 255),
    Rgb::new(255, 0, 255),
    Rgb::new(0, 255, 255),
    Rgb::new(255, 255, 255),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_background(bg: Rgb) -> Self {
        if bg.is_dark() {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Guess from a `COLORFGBG` value (`"15;0"`, `"default;default;0"`):
    /// the last field is the background palette index.
    pub fn from_colorfgbg(value: &str) -> Option<Self> {
        let index: usize = value.rsplit(';').next()?.trim().parse().ok()?;
        ANSI_PALETTE.get(index).map(|bg| Theme::from_background(*bg))
    }

    fn style_sheet(&self) -> &'static str {
        match self {
            Theme::Light => LIGHT_STYLE,
            Theme::Dark => DARK_STYLE,
        }
    }
}

/// A complete HTML fragment, style sheet included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupDocument(String);

impl MarkupDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkupDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn extract(document: &Value) -> Result<TaxRecord, QueryError> {
    TaxRecord::from_value(document).map_err(|e| QueryError::ProcessingError(e.to_string()))
}

pub fn render_html(document: &Value, theme: Theme) -> Result<MarkupDocument, QueryError> {
    let record = extract(document)?;
    let mut html = String::from(theme.style_sheet());

    html.push_str(r#"<div class="titulo">General Information</div>"#);
    html.push_str(&format!(
        r#"<div class="dato">Name: <span class="valor">{}</span></div>"#,
        escape(&record.nombre())
    ));
    html.push_str(&format!(
        r#"<div class="dato">Status: <span class="valor">{}</span></div>"#,
        escape(&record.estado())
    ));

    html.push_str(r#"<div class="seccion">Activities</div>"#);
    let actividades = record.actividades();
    if actividades.is_empty() {
        html.push_str(&format!(r#"<div class="actividad">{NO_ACTIVITY}</div>"#));
    }
    for (i, act) in actividades.iter().enumerate() {
        html.push_str(&format!(
            "<div class=\"actividad\">\n\
             <span class=\"label\">{}. Code:</span> {}<br>\n\
             <span class=\"label\">Description:</span> {}<br>\n\
             <span class=\"label\">Status:</span> <span class=\"valor\">{}</span> | \
             <span class=\"label\">Type:</span> <span class=\"valor\">{}</span>\n\
             </div>",
            i + 1,
            escape(&act.codigo()),
            escape(&act.descripcion()),
            escape(&act.estado()),
            escape(&act.tipo()),
        ));
    }

    if let Some(regimen) = &record.regimen {
        html.push_str(r#"<div class="seccion">Regime</div>"#);
        html.push_str(&format!(r#"<div class="extra">{}</div>"#, escape(&regimen.descripcion())));
    }

    if let Some(situacion) = record.situacion() {
        html.push_str(r#"<div class="seccion">Tax Compliance Status</div>"#);
        html.push_str(&format!(
            r#"<div class="extra">Delinquent: {}<br>Non-filer: {}<br>Administration: {}</div>"#,
            escape(&situacion.moroso()),
            escape(&situacion.omiso()),
            escape(&situacion.administracion_tributaria()),
        ));
    }

    Ok(MarkupDocument(html))
}

/// Terminal rendering of the same sections.
pub fn render_text(document: &Value) -> Result<String, QueryError> {
    let record = extract(document)?;
    let mut out = String::new();

    out.push_str(&format!("{}\n", "General Information".bold().cyan()));
    out.push_str(&format!("  {} {}\n", "Name:".bold(), record.nombre().green()));
    out.push_str(&format!("  {} {}\n", "Status:".bold(), record.estado().green()));

    out.push_str(&format!("\n{}\n", "Activities".bold().cyan()));
    let actividades = record.actividades();
    if actividades.is_empty() {
        out.push_str(&format!("  {}\n", NO_ACTIVITY.dimmed()));
    }
    for (i, act) in actividades.iter().enumerate() {
        out.push_str(&format!("  {} {}\n", format!("{}. Code:", i + 1).bold(), act.codigo()));
        out.push_str(&format!("     {} {}\n", "Description:".bold(), act.descripcion()));
        out.push_str(&format!(
            "     {} {} | {} {}\n",
            "Status:".bold(),
            act.estado().green(),
            "Type:".bold(),
            act.tipo().green()
        ));
    }

    if let Some(regimen) = &record.regimen {
        out.push_str(&format!("\n{}\n", "Regime".bold().cyan()));
        out.push_str(&format!("  {}\n", regimen.descripcion().magenta()));
    }

    if let Some(situacion) = record.situacion() {
        out.push_str(&format!("\n{}\n", "Tax Compliance Status".bold().cyan()));
        out.push_str(&format!("  {} {}\n", "Delinquent:".bold(), situacion.moroso().magenta()));
        out.push_str(&format!("  {} {}\n", "Non-filer:".bold(), situacion.omiso().magenta()));
        out.push_str(&format!(
            "  {} {}\n",
            "Administration:".bold(),
            situacion.administracion_tributaria().magenta()
        ));
    }

    Ok(out)
}

/// Plain-text form of a failure for the result area.
pub fn render_error(message: &str) -> String {
    format!("ERROR: {message}")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};
    use serde_json::json;

    fn texts(html: &MarkupDocument, selector: &str) -> Vec<String> {
        let doc = Html::parse_fragment(html.as_str());
        let sel = Selector::parse(selector).unwrap();
        doc.select(&sel)
            .map(|e| e.text().collect::<String>().trim().to_string())
            .collect()
    }

    #[test]
    fn acme_with_no_activities() {
        let doc = json!({"nombre": "ACME SA", "situacion": {"estado": "A"}, "actividades": []});
        let html = render_html(&doc, Theme::Light).unwrap();

        assert_eq!(texts(&html, ".dato .valor"), vec!["ACME SA", "A"]);
        assert_eq!(texts(&html, ".actividad"), vec![NO_ACTIVITY]);
        assert_eq!(
            texts(&html, ".seccion"),
            vec!["Activities", "Tax Compliance Status"]
        );
    }

    #[test]
    fn sections_follow_fixed_order() {
        let doc = json!({
            "nombre": "COOPERATIVA",
            "situacion": {"estado": "Inscrito", "moroso": "NO", "omiso": "NO", "administracionTributaria": "San José"},
            "regimen": {"codigo": 1, "descripcion": "Régimen General"},
            "actividades": [
                {"codigo": "620100", "descripcion": "PROGRAMACION", "estado": "A", "tipo": "P"},
                {"codigo": "702000", "descripcion": "CONSULTORIA", "estado": "I", "tipo": "S"}
            ]
        });
        let html = render_html(&doc, Theme::Dark).unwrap();

        assert_eq!(
            texts(&html, ".titulo, .seccion"),
            vec!["General Information", "Activities", "Regime", "Tax Compliance Status"]
        );
        assert_eq!(
            texts(&html, ".actividad .valor"),
            vec!["Active", "Primary", "Inactive", "Secondary"]
        );
        let extra = texts(&html, ".extra");
        assert_eq!(extra[0], "Régimen General");
        assert!(extra[1].contains("Administration: San José"));
        assert!(html.as_str().contains("1. Code:"));
        assert!(html.as_str().contains("2. Code:"));
    }

    #[test]
    fn optional_sections_are_skipped() {
        let html = render_html(&json!({"nombre": "SOLO"}), Theme::Light).unwrap();
        assert_eq!(texts(&html, ".seccion"), vec!["Activities"]);
        assert_eq!(texts(&html, ".dato .valor"), vec!["SOLO", "Not available"]);
    }

    #[test]
    fn unknown_codes_pass_through() {
        let doc = json!({"actividades": [{"estado": "X", "tipo": "Q"}]});
        let html = render_html(&doc, Theme::Light).unwrap();
        assert_eq!(texts(&html, ".actividad .valor"), vec!["X", "Q"]);
    }

    #[test]
    fn values_are_escaped() {
        let doc = json!({"nombre": "<script>alert(1)</script> & Co"});
        let html = render_html(&doc, Theme::Light).unwrap();
        assert!(!html.as_str().contains("<script>"));
        assert_eq!(texts(&html, ".dato .valor")[0], "<script>alert(1)</script> & Co");
    }

    #[test]
    fn theme_picks_style_sheet() {
        let light = render_html(&json!({}), Theme::Light).unwrap();
        let dark = render_html(&json!({}), Theme::Dark).unwrap();
        assert!(light.as_str().starts_with(LIGHT_STYLE));
        assert!(dark.as_str().starts_with(DARK_STYLE));
    }

    #[test]
    fn luminance_threshold() {
        assert_eq!(Theme::from_background(Rgb::new(127, 128, 128)), Theme::Dark);
        assert_eq!(Theme::from_background(Rgb::new(128, 128, 128)), Theme::Light);
        assert_eq!(Rgb::parse_hex("#1e1e1e"), Some(Rgb::new(30, 30, 30)));
        assert_eq!(Rgb::parse_hex("fffff"), None);
        assert_eq!(Rgb::parse_hex("zzzzzz"), None);
    }

    #[test]
    fn colorfgbg_uses_background_index() {
        assert_eq!(Theme::from_colorfgbg("15;0"), Some(Theme::Dark));
        assert_eq!(Theme::from_colorfgbg("0;15"), Some(Theme::Light));
        assert_eq!(Theme::from_colorfgbg("default;default;0"), Some(Theme::Dark));
        assert_eq!(Theme::from_colorfgbg("default"), None);
        assert_eq!(Theme::from_colorfgbg("0;42"), None);
    }

    #[test]
    fn bad_shape_is_processing_error() {
        let err = render_html(&json!({"actividades": 7}), Theme::Light).unwrap_err();
        assert!(matches!(err, QueryError::ProcessingError(_)));
        assert!(render_text(&json!("just a string")).is_err());
    }

    #[test]
    fn text_rendering_has_placeholder_and_values() {
        let doc = json!({"nombre": "ACME SA", "situacion": {"estado": "A"}, "actividades": []});
        let text = render_text(&doc).unwrap();
        assert!(text.contains("ACME SA"));
        assert!(text.contains(NO_ACTIVITY));
        assert!(text.contains("Tax Compliance Status"));
        assert!(!text.contains("Regime"));
    }

    #[test]
    fn error_text_is_prefixed() {
        assert_eq!(render_error("boom"), "ERROR: boom");
    }
}
