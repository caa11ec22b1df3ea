//! Response format selection and rendering.
//!
//! `?format=json` (the default) renders with `serde_json`; `?format=xml`
//! renders the same types with `quick_xml::se`. A listing becomes a
//! `<scores>` element holding one `<score>` per entry.

use axum::{
  Json,
  http::header,
  response::{IntoResponse, Response},
};
use nwi_core::score::ScoreEntry;
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
  #[default]
  Json,
  Xml,
}

#[derive(Serialize)]
#[serde(rename = "scores")]
struct ScoreList<'a> {
  score: &'a [ScoreEntry],
}

impl OutputFormat {
  /// Parse the `format` query value. Absent means JSON; anything other than
  /// `json` or `xml` (case-insensitive) is rejected.
  pub fn from_param(raw: Option<&str>) -> Result<Self, ApiError> {
    match raw.map(str::trim) {
      None | Some("") => Ok(Self::Json),
      Some(f) if f.eq_ignore_ascii_case("json") => Ok(Self::Json),
      Some(f) if f.eq_ignore_ascii_case("xml") => Ok(Self::Xml),
      Some(other) => Err(ApiError::BadFormat(other.to_owned())),
    }
  }

  /// Render a single record. XML wraps it in a `root` element.
  pub fn render<T: Serialize>(self, root: &str, value: &T) -> Result<Response, ApiError> {
    match self {
      Self::Json => Ok(Json(value).into_response()),
      Self::Xml => xml(root, value),
    }
  }

  pub fn render_list(self, entries: &[ScoreEntry]) -> Result<Response, ApiError> {
    match self {
      Self::Json => Ok(Json(entries).into_response()),
      Self::Xml => xml("scores", &ScoreList { score: entries }),
    }
  }
}

/// Flattened records serialize as maps, which need an explicit root element.
fn xml<T: Serialize>(root: &str, value: &T) -> Result<Response, ApiError> {
  let body = quick_xml::se::to_string_with_root(root, value)
    .map_err(|e| ApiError::Render(e.to_string()))?;
  Ok(([(header::CONTENT_TYPE, "application/xml")], body).into_response())
}

#[cfg(test)]
mod tests {
  use nwi_core::Geoid;

  use super::*;

  #[test]
  fn absent_format_is_json() {
    assert_eq!(OutputFormat::from_param(None).unwrap(), OutputFormat::Json);
    assert_eq!(OutputFormat::from_param(Some("")).unwrap(), OutputFormat::Json);
  }

  #[test]
  fn format_is_case_insensitive() {
    assert_eq!(OutputFormat::from_param(Some("XML")).unwrap(), OutputFormat::Xml);
    assert_eq!(OutputFormat::from_param(Some("Json")).unwrap(), OutputFormat::Json);
  }

  #[test]
  fn unknown_format_is_rejected() {
    let err = OutputFormat::from_param(Some("yaml")).unwrap_err();
    assert!(matches!(err, ApiError::BadFormat(f) if f == "yaml"));
  }

  #[test]
  fn listing_renders_as_repeated_score_elements() {
    let entry = ScoreEntry {
      id:                                0,
      geoid:                             Geoid::new(6_001_400_100),
      csa_name:                          "San Jose-San Francisco-Oakland, CA".into(),
      cbsa_name:                         "San Francisco-Oakland-Berkeley, CA".into(),
      nwi:                               14.2,
      regional_transit_usage_percentage: 16.8,
      regional_transit_usage:            345_210.0,
      regional_bike_ridership:           21_000,
    };
    let xml = quick_xml::se::to_string(&ScoreList { score: &[entry.clone(), entry] }).unwrap();
    assert!(xml.starts_with("<scores><score>"), "{xml}");
    assert_eq!(xml.matches("<score>").count(), 2, "{xml}");
    assert!(xml.contains("<geoid>6001400100</geoid>"), "{xml}");
    assert!(xml.contains("<nwi>14.2</nwi>"), "{xml}");
  }
}
