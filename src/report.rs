use crate::errors::ApiError;
use chrono::{NaiveDate, Utc};
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};
use tokio::fs;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Pdf,
    Text,
}

impl ReportFormat {
    /// Value of the `format` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Text => "txt",
        }
    }

    pub fn extension(self) -> &'static str {
        self.as_str()
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "txt" | "text" => Ok(Self::Text),
            other => Err(format!("unknown report format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportKind {
    #[default]
    Summary,
    Weekly,
    Monthly,
    Quarterly,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [Self::Summary, Self::Weekly, Self::Monthly, Self::Quarterly];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
        }
    }

    pub fn default_days(self) -> u32 {
        match self {
            Self::Weekly => 7,
            Self::Summary | Self::Monthly => 30,
            Self::Quarterly => 90,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Summary => "Doctor Summary",
            Self::Weekly => "Weekly Health Summary",
            Self::Monthly => "Monthly Trend Report",
            Self::Quarterly => "Quarterly Health Review",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Summary => "Clinical summary of the past 30 days, ready to share",
            Self::Weekly => "Overview of your health patterns from the past 7 days",
            Self::Monthly => "Detailed analysis of symptom patterns and medication adherence",
            Self::Quarterly => "Comprehensive health review with recommendations",
        }
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown report type '{}'", value.trim()))
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRequest {
    pub days: u32,
    pub kind: ReportKind,
    pub format: ReportFormat,
}

impl ReportRequest {
    pub fn for_kind(kind: ReportKind, format: ReportFormat) -> Self {
        Self {
            days: kind.default_days(),
            kind,
            format,
        }
    }
}

impl Default for ReportRequest {
    fn default() -> Self {
        Self::for_kind(ReportKind::Summary, ReportFormat::Pdf)
    }
}

#[derive(Debug, Clone)]
pub struct DownloadedReport {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl DownloadedReport {
    /// Writes the report into `dir`, keeping only the final path component of its name.
    pub async fn save_to(&self, dir: &Path) -> Result<PathBuf, ApiError> {
        fs::create_dir_all(dir).await?;
        let path = dir.join(safe_file_name(&self.filename));
        fs::write(&path, &self.bytes).await?;
        info!(path = %path.display(), bytes = self.bytes.len(), "saved report");
        Ok(path)
    }
}

/// Resolves the saved filename from a `Content-Disposition` header, if any.
/// The fallback name carries the UTC date.
pub fn resolve_filename(disposition: Option<&str>, format: ReportFormat) -> String {
    disposition
        .and_then(filename_from_disposition)
        .unwrap_or_else(|| default_report_filename(Utc::now().date_naive(), format))
}

pub fn filename_from_disposition(value: &str) -> Option<String> {
    disposition_params(value).into_iter().find_map(|part| {
        let (name, raw) = part.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let raw = raw.trim();
        let unquoted = raw
            .strip_prefix('"')
            .map(|rest| rest.strip_suffix('"').unwrap_or(rest))
            .unwrap_or(raw)
            .trim();
        (!unquoted.is_empty()).then(|| unquoted.to_string())
    })
}

/// Splits on `;` outside of quoted strings.
fn disposition_params(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    for (i, ch) in value.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            ';' if !quoted => {
                params.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(&value[start..]);
    params
}

pub fn default_report_filename(date: NaiveDate, format: ReportFormat) -> String {
    format!(
        "healthvoice_report_{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

fn safe_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if base.is_empty() || base == "." || base == ".." {
        default_report_filename(Utc::now().date_naive(), ReportFormat::Pdf)
    } else {
        base.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_filename_quoted_and_bare() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="foo.pdf""#).as_deref(),
            Some("foo.pdf")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=healthvoice_report_20250101_101010.txt")
                .as_deref(),
            Some("healthvoice_report_20250101_101010.txt")
        );
        assert_eq!(filename_from_disposition("attachment"), None);
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="a;b.pdf"; size=10"#).as_deref(),
            Some("a;b.pdf")
        );
        assert_eq!(filename_from_disposition(r#"attachment; filename="""#), None);
        assert_eq!(
            filename_from_disposition("attachment; filename*=UTF-8''x.pdf"),
            None
        );
    }

    #[test]
    fn default_filename_embeds_date_and_extension() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(
            default_report_filename(date, ReportFormat::Pdf),
            "healthvoice_report_2026-03-09.pdf"
        );
        assert_eq!(
            default_report_filename(date, ReportFormat::Text),
            "healthvoice_report_2026-03-09.txt"
        );
    }

    #[test]
    fn resolve_without_header_uses_utc_today() {
        let name = resolve_filename(None, ReportFormat::Text);
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(name, format!("healthvoice_report_{today}.txt"));
    }

    #[test]
    fn kinds_parse_and_carry_periods() {
        assert_eq!("Quarterly".parse::<ReportKind>(), Ok(ReportKind::Quarterly));
        assert_eq!(ReportKind::Weekly.default_days(), 7);
        assert!("yearly".parse::<ReportKind>().is_err());
        assert_eq!("txt".parse::<ReportFormat>(), Ok(ReportFormat::Text));
    }

    #[tokio::test]
    async fn save_strips_directories() {
        let dir = tempfile::tempdir().unwrap();
        let report = DownloadedReport {
            filename: "../../etc/foo.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: b"%PDF-1.4".to_vec(),
        };

        let path = report.save_to(dir.path()).await.unwrap();
        assert_eq!(path, dir.path().join("foo.pdf"));
        assert_eq!(std::fs::read(path).unwrap(), b"%PDF-1.4");
    }
}
