use crate::models::episode::Episode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// TMDB `/tv/{id}/season/{n}` payload. Also the shape of offline snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonResponse {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub episodes: Option<Vec<Episode>>,
    pub season_number: i32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonHeader {
    pub season_number: String,
    pub season_name: Option<String>,
    pub season_poster_path: Option<String>,
    pub season_overview: String,
}

impl SeasonHeader {
    /// Builds the header shown above the episode list.
    ///
    /// When TMDB has no overview one is synthesized from the episode count and
    /// the premiere date relative to `today`.
    #[must_use]
    pub fn from_season(season: &SeasonResponse, show_name: &str, today: NaiveDate) -> Self {
        let overview = match season.overview.as_deref() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => synthesize_overview(season, show_name, today),
        };

        Self {
            season_number: format!("Season {}", season.season_number),
            season_name: season.name.clone(),
            season_poster_path: season.poster_path.clone(),
            season_overview: overview,
        }
    }
}

fn synthesize_overview(season: &SeasonResponse, show_name: &str, today: NaiveDate) -> String {
    let mut overview = format!("Season {} of {}", season.season_number, show_name);

    if let Some(episodes) = &season.episodes {
        match episodes.len() {
            1 => overview.push_str(" with 1 episode"),
            n => overview.push_str(&format!(" with {n} episodes")),
        }
    }

    match season
        .air_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    {
        Some(date) if date > today => {
            overview.push_str(&format!(
                " is scheduled to premiere on {}",
                date.format("%B %-d, %Y")
            ));
        }
        Some(date) => {
            overview.push_str(&format!(" premiered on {}", date.format("%B %-d, %Y")));
        }
        None => overview.push_str(" is scheduled to premiere soon"),
    }

    overview
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season(overview: Option<&str>, air_date: Option<&str>, episodes: usize) -> SeasonResponse {
        SeasonResponse {
            id: None,
            episodes: Some(
                (1..=episodes)
                    .map(|n| Episode::new(2, i32::try_from(n).unwrap(), "ep"))
                    .collect(),
            ),
            season_number: 2,
            name: Some("Season 2".to_string()),
            poster_path: None,
            overview: overview.map(str::to_string),
            air_date: air_date.map(str::to_string),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn keeps_tmdb_overview() {
        let header = SeasonHeader::from_season(&season(Some("Winter arrives."), None, 3), "Show", today());
        assert_eq!(header.season_overview, "Winter arrives.");
        assert_eq!(header.season_number, "Season 2");
    }

    #[test]
    fn synthesizes_premiered_overview() {
        let header = SeasonHeader::from_season(&season(None, Some("2012-04-01"), 10), "Show", today());
        assert_eq!(
            header.season_overview,
            "Season 2 of Show with 10 episodes premiered on April 1, 2012"
        );
    }

    #[test]
    fn synthesizes_upcoming_overview() {
        let header = SeasonHeader::from_season(&season(Some(""), Some("2030-01-15"), 1), "Show", today());
        assert_eq!(
            header.season_overview,
            "Season 2 of Show with 1 episode is scheduled to premiere on January 15, 2030"
        );
    }

    #[test]
    fn synthesizes_soon_without_air_date() {
        let header = SeasonHeader::from_season(&season(None, None, 0), "Show", today());
        assert_eq!(
            header.season_overview,
            "Season 2 of Show with 0 episodes is scheduled to premiere soon"
        );
    }
}
