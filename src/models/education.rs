//! Education records and the CGPA/recency rules derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;

/// One education entry. A user can have many.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    /// Education ID (also used as document ID)
    pub id: String,
    /// Owning user ID
    pub user_id: String,
    pub institution: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub field_of_study: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Absent while the entry is ongoing
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current: bool,
    /// Overall grade as entered by the user
    #[serde(default, deserialize_with = "lenient_grade")]
    pub score: Option<String>,
    #[serde(default)]
    pub semesters: Vec<Semester>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

/// Per-semester grades.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    #[serde(default)]
    pub semester: u32,
    #[serde(default, deserialize_with = "lenient_grade")]
    pub sgpa: Option<String>,
    #[serde(default, deserialize_with = "lenient_grade")]
    pub cgpa: Option<String>,
    #[serde(default)]
    pub grade_sheet: Option<String>,
}

impl Education {
    /// CGPA for this record.
    ///
    /// The overall `score` wins when it is numeric, then the `cgpa` of the
    /// last semester, then 0.
    pub fn cgpa(&self) -> f64 {
        parse_grade(self.score.as_deref())
            .or_else(|| parse_grade(self.semesters.last().and_then(|s| s.cgpa.as_deref())))
            .unwrap_or(0.0)
    }
}

/// Sort newest first: `end_date` descending, then `start_date` descending.
///
/// Missing dates order below any present date. The sort is stable.
pub fn sort_most_recent_first(records: &mut [Education]) {
    records.sort_by(|a, b| recency(b, a));
}

fn recency(a: &Education, b: &Education) -> Ordering {
    a.end_date
        .cmp(&b.end_date)
        .then_with(|| a.start_date.cmp(&b.start_date))
}

/// The whole trimmed value must be a number; `"8.2/10"` is not.
fn parse_grade(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Grades arrive as either strings or bare numbers.
fn lenient_grade<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Grade {
        Text(String),
        Number(f64),
    }

    Ok(Option::<Grade>::deserialize(deserializer)?.map(|grade| match grade {
        Grade::Text(s) => s,
        Grade::Number(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(year: i32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(year, 6, 1, 0, 0, 0).unwrap())
    }

    fn semester(sgpa: Option<&str>, cgpa: Option<&str>) -> Semester {
        Semester {
            semester: 1,
            sgpa: sgpa.map(String::from),
            cgpa: cgpa.map(String::from),
            grade_sheet: None,
        }
    }

    #[test]
    fn test_cgpa_prefers_score() {
        let edu = Education {
            score: Some("8.75".to_string()),
            semesters: vec![semester(None, Some("6.0"))],
            ..Default::default()
        };
        assert_eq!(edu.cgpa(), 8.75);
    }

    #[test]
    fn test_cgpa_falls_back_to_last_semester() {
        let edu = Education {
            score: None,
            semesters: vec![semester(Some("7"), None), semester(None, Some("8.2"))],
            ..Default::default()
        };
        assert_eq!(edu.cgpa(), 8.2);
    }

    #[test]
    fn test_cgpa_non_numeric_score_uses_semesters() {
        let edu = Education {
            score: Some("First Class".to_string()),
            semesters: vec![semester(None, Some("9.0"))],
            ..Default::default()
        };
        assert_eq!(edu.cgpa(), 9.0);
    }

    #[test]
    fn test_cgpa_grade_with_suffix_is_not_numeric() {
        let edu = Education {
            score: Some("8.2/10".to_string()),
            semesters: vec![semester(None, Some("8.5 CGPA"))],
            ..Default::default()
        };
        assert_eq!(edu.cgpa(), 0.0);

        let edu = Education {
            score: Some(" 7.9 ".to_string()),
            ..Default::default()
        };
        assert_eq!(edu.cgpa(), 7.9);
    }

    #[test]
    fn test_cgpa_only_checks_last_semester() {
        let edu = Education {
            semesters: vec![semester(None, Some("8.0")), semester(Some("7.5"), None)],
            ..Default::default()
        };
        assert_eq!(edu.cgpa(), 0.0);
    }

    #[test]
    fn test_sort_most_recent_first() {
        let mut records = vec![
            Education {
                id: "school".into(),
                start_date: date(2010),
                end_date: date(2014),
                ..Default::default()
            },
            Education {
                id: "masters".into(),
                start_date: date(2018),
                end_date: date(2020),
                ..Default::default()
            },
            Education {
                id: "phd".into(),
                start_date: date(2021),
                end_date: None,
                current: true,
                ..Default::default()
            },
            Education {
                id: "bachelors".into(),
                start_date: date(2014),
                end_date: date(2018),
                ..Default::default()
            },
        ];

        sort_most_recent_first(&mut records);

        let ids: Vec<&str> = records.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["masters", "bachelors", "school", "phd"]);
    }

    #[test]
    fn test_same_end_date_breaks_tie_on_start_date() {
        let mut records = vec![
            Education {
                id: "early".into(),
                start_date: date(2015),
                end_date: date(2020),
                ..Default::default()
            },
            Education {
                id: "late".into(),
                start_date: date(2017),
                end_date: date(2020),
                ..Default::default()
            },
        ];

        sort_most_recent_first(&mut records);
        assert_eq!(records[0].id, "late");
    }

    #[test]
    fn test_numeric_grades_deserialize() {
        let edu: Education = serde_json::from_str(
            r#"{"id":"e1","userId":"u1","institution":"IIT","score":9.5,
                "semesters":[{"semester":1,"sgpa":8,"cgpa":"8.1"}]}"#,
        )
        .unwrap();

        assert_eq!(edu.score.as_deref(), Some("9.5"));
        assert_eq!(edu.semesters[0].sgpa.as_deref(), Some("8"));
        assert_eq!(edu.cgpa(), 9.5);
    }
}
