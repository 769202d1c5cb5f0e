//! render_json.rs: JSON renderer (dataset → runs → integrity).
//!
//! Key order follows the model's field declaration order, so output is stable
//! without relying on map ordering features.

use crate::{ReportError, ReportModel};

/// Pretty JSON with a trailing newline.
pub fn render_json(m: &ReportModel) -> Result<String, ReportError> {
    let mut s = serde_json::to_string_pretty(m).map_err(|e| ReportError::Render(e.to_string()))?;
    s.push('\n');
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_model, tests::sample};
    use assert_json_diff::assert_json_eq;
    use serde_json::{json, Value};

    #[test]
    fn json_shape() {
        let (roster, runs) = sample();
        let m = build_model(&roster, &runs[1..], None).unwrap();
        assert_json_eq!(
            serde_json::from_str::<serde_json::Value>(&render_json(&m).unwrap()).unwrap(),
            json!({
                "dataset": {
                    "total_students": 8,
                    "total_categories": 2,
                    "categories": [{"code": "AI", "count": 5}, {"code": "CB", "count": 3}]
                },
                "runs": [{
                    "strategy": "size_balanced",
                    "title": "Uniform groups",
                    "group_count": 2,
                    "target_size": 4,
                    "groups": [
                        {"label": "G1", "size": 4, "distribution": [{"code": "AI", "count": 4}]},
                        {"label": "G2", "size": 4, "distribution": [
                            {"code": "CB", "count": 3}, {"code": "AI", "count": 1}
                        ]}
                    ],
                    "empty_groups": 0
                }]
            })
        );
    }

    #[test]
    fn rendered_text_parses_back() {
        let (roster, runs) = sample();
        let m = build_model(&roster, &runs, None).unwrap();
        let s = render_json(&m).unwrap();
        assert!(s.ends_with("}\n"));
        let v: Value = serde_json::from_str(&s).unwrap();
        assert_eq!(v["runs"][0]["strategy"], "round_robin");
        assert!(v.get("integrity").is_none());
    }
}
