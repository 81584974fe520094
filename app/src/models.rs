//! Tax record as returned by `GET /fe/ae`.
//!
//! The schema belongs to Hacienda. Every field is optional and scalar leaves
//! are kept as raw JSON so a string, a boolean or a number all display.

use serde::Deserialize;
use serde_json::{Map, Value};

pub const NOT_AVAILABLE: &str = "Not available";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaxRecord {
    #[serde(default)]
    pub nombre: Option<Value>,
    #[serde(default)]
    pub situacion: Option<Situacion>,
    #[serde(default)]
    pub actividades: Option<Vec<Actividad>>,
    #[serde(default)]
    pub regimen: Option<Regimen>,
}

/// Compliance block, kept as the raw key map: a key sent with `null` still
/// makes the block present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Situacion(Map<String, Value>);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Actividad {
    #[serde(default)]
    pub codigo: Option<Value>,
    #[serde(default)]
    pub descripcion: Option<Value>,
    #[serde(default)]
    pub estado: Option<Value>,
    #[serde(default)]
    pub tipo: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Regimen {
    #[serde(default)]
    pub descripcion: Option<Value>,
}

impl TaxRecord {
    /// Best-effort extraction from the raw document. A shape that cannot be
    /// read at all (an array where an object belongs, and so on) is an error.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        TaxRecord::deserialize(value)
    }

    pub fn nombre(&self) -> String {
        text_or(self.nombre.as_ref(), NOT_AVAILABLE)
    }

    pub fn estado(&self) -> String {
        self.situacion
            .as_ref()
            .map(|s| text_or(s.0.get("estado"), NOT_AVAILABLE))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn actividades(&self) -> &[Actividad] {
        self.actividades.as_deref().unwrap_or(&[])
    }

    /// The compliance block, only when Hacienda sent a non-empty one.
    pub fn situacion(&self) -> Option<&Situacion> {
        self.situacion.as_ref().filter(|s| !s.is_empty())
    }
}

impl Situacion {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn moroso(&self) -> String {
        text_or(self.0.get("moroso"), NOT_AVAILABLE)
    }

    pub fn omiso(&self) -> String {
        text_or(self.0.get("omiso"), NOT_AVAILABLE)
    }

    pub fn administracion_tributaria(&self) -> String {
        text_or(self.0.get("administracionTributaria"), NOT_AVAILABLE)
    }
}

impl Actividad {
    pub fn codigo(&self) -> String {
        text_or(self.codigo.as_ref(), "No code")
    }

    pub fn descripcion(&self) -> String {
        text_or(self.descripcion.as_ref(), "No description")
    }

    pub fn estado(&self) -> String {
        status_label(&text_or(self.estado.as_ref(), "N/A")).to_string()
    }

    pub fn tipo(&self) -> String {
        type_label(&text_or(self.tipo.as_ref(), "N/A")).to_string()
    }
}

impl Regimen {
    pub fn descripcion(&self) -> String {
        text_or(self.descripcion.as_ref(), NOT_AVAILABLE)
    }
}

/// `A`/`I` activity status codes; anything else is shown as received.
pub fn status_label(code: &str) -> &str {
    match code {
        "A" => "Active",
        "I" => "Inactive",
        other => other,
    }
}

/// `P`/`S` activity type codes; anything else is shown as received.
pub fn type_label(code: &str) -> &str {
    match code {
        "P" => "Primary",
        "S" => "Secondary",
        other => other,
    }
}

fn text_or(value: Option<&Value>, placeholder: &str) -> String {
    match value {
        None | Some(Value::Null) => placeholder.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_fall_back_to_placeholders() {
        let record = TaxRecord::from_value(&json!({})).unwrap();
        assert_eq!(record.nombre(), NOT_AVAILABLE);
        assert_eq!(record.estado(), NOT_AVAILABLE);
        assert!(record.actividades().is_empty());
        assert!(record.situacion().is_none());
        assert!(record.regimen.is_none());
    }

    #[test]
    fn scalar_leaves_accept_any_json_type() {
        let record = TaxRecord::from_value(&json!({
            "nombre": null,
            "situacion": { "estado": "Inscrito", "moroso": "NO", "omiso": false, "administracionTributaria": 14 }
        }))
        .unwrap();
        let situacion = record.situacion().unwrap();
        assert_eq!(record.nombre(), NOT_AVAILABLE);
        assert_eq!(record.estado(), "Inscrito");
        assert_eq!(situacion.moroso(), "NO");
        assert_eq!(situacion.omiso(), "false");
        assert_eq!(situacion.administracion_tributaria(), "14");
    }

    #[test]
    fn empty_situacion_counts_as_absent() {
        let record = TaxRecord::from_value(&json!({ "situacion": {} })).unwrap();
        assert!(record.situacion().is_none());
    }

    #[test]
    fn situacion_with_only_null_keys_is_present() {
        let record = TaxRecord::from_value(&json!({ "situacion": { "moroso": null } })).unwrap();
        let situacion = record.situacion().expect("block with a key is present");
        assert_eq!(situacion.moroso(), NOT_AVAILABLE);
        assert_eq!(record.estado(), NOT_AVAILABLE);
    }

    #[test]
    fn activity_codes_map_and_pass_through() {
        assert_eq!(status_label("A"), "Active");
        assert_eq!(status_label("I"), "Inactive");
        assert_eq!(status_label("X"), "X");
        assert_eq!(type_label("P"), "Primary");
        assert_eq!(type_label("S"), "Secondary");
        assert_eq!(type_label("Z"), "Z");

        let act: Actividad = serde_json::from_value(json!({ "estado": "I", "tipo": "S" })).unwrap();
        assert_eq!(act.estado(), "Inactive");
        assert_eq!(act.tipo(), "Secondary");
        assert_eq!(act.codigo(), "No code");
        assert_eq!(act.descripcion(), "No description");
    }

    #[test]
    fn wrong_shape_is_an_extraction_error() {
        assert!(TaxRecord::from_value(&json!({ "actividades": "none" })).is_err());
        assert!(TaxRecord::from_value(&json!({ "situacion": 3 })).is_err());
        assert!(TaxRecord::from_value(&json!([1, 2])).is_err());
    }
}
