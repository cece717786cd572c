use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub read_time: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Post {
    #[serde(flatten)]
    pub summary: PostSummary,
    #[serde(default)]
    pub html: String,
}

fn parse_date(date: &str) -> (i32, u32, u32) {
    let day_part = date.get(..10).unwrap_or(date);
    let parts: Vec<&str> = day_part.split('-').collect();
    let year = parts.first().and_then(|v| v.parse().ok()).unwrap_or(0);
    let month = parts.get(1).and_then(|v| v.parse().ok()).unwrap_or(0);
    let day = parts.get(2).and_then(|v| v.parse().ok()).unwrap_or(0);
    (year, month, day)
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "???",
    }
}

pub fn format_date(date: &str) -> String {
    let (year, month, day) = parse_date(date);
    format!("{} {day:02}, {year}", month_label(month))
}

pub fn format_ls_date(date: &str) -> String {
    let (_, month, day) = parse_date(date);
    format!("{} {day:02}", month_label(month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_plain_and_timestamped_dates() {
        assert_eq!(format_date("2024-01-05"), "Jan 05, 2024");
        assert_eq!(format_date("2023-11-30T08:00:00Z"), "Nov 30, 2023");
        assert_eq!(format_ls_date("2024-07-09"), "Jul 09");
    }

    #[test]
    fn garbage_dates_do_not_panic() {
        assert_eq!(format_ls_date("soon"), "??? 00");
    }

    #[test]
    fn decodes_api_payload() {
        let post: Post = serde_json::from_str(
            r#"{"slug":"a","title":"A","description":"","date":"2024-01-01","tags":["x"],"readTime":"1 min","readMinutes":1,"content":"hi","html":"<p>hi</p>"}"#,
        )
        .unwrap();
        assert_eq!(post.summary.read_time, "1 min");
        assert_eq!(post.html, "<p>hi</p>");
    }
}
