use crate::models::{DashboardOverview, DoctorSummary, Insights};
use crate::report::ReportKind;
use crate::state::{DashboardSnapshot, Notice, NoticeKind};
use crate::views::{
    ChartPoint, FAILED_SUMMARY_TEXT, HistoryEntry, NO_SUMMARY_TEXT, TileTrend, ViewState,
    VoiceAnalysis, filter_entries, insight_sections, overview_tiles,
};
use crate::voice::{RecordingState, VoiceSnapshot};

/// Page chrome shared by every route.
#[derive(Debug, Clone)]
pub struct Shell {
    pub active: &'static str,
    pub display_name: String,
    pub initials: String,
    pub notice: Option<Notice>,
}

const NAV: [(&str, &str); 5] = [
    ("/", "Dashboard"),
    ("/analysis", "Voice Analysis"),
    ("/history", "Health History"),
    ("/reports", "Reports"),
    ("/settings", "Settings"),
];

pub fn render_dashboard(shell: &Shell, snapshot: &DashboardSnapshot) -> String {
    let content = format!(
        r#"<section class="tiles">{tiles}</section>
<div class="grid">
  {voice}
  {insights}
</div>
{trends}
{summary}"#,
        tiles = render_tiles(&snapshot.overview),
        voice = render_voice(&snapshot.voice),
        insights = render_insights(&snapshot.insights),
        trends = render_trends(&snapshot.trends),
        summary = render_summary(&snapshot.summary),
    );
    render_page(shell, "Dashboard", &content)
}

pub fn render_history(shell: &Shell, state: &ViewState<Vec<HistoryEntry>>, search: &str) -> String {
    let body = match state {
        ViewState::Loading => loading(),
        ViewState::Failed(message) => fallback(&format!("Failed to fetch health history: {message}")),
        ViewState::Empty => fallback("Start logging your health to see your history here."),
        ViewState::Loaded(entries) => {
            let rows: String = filter_entries(entries, search)
                .into_iter()
                .map(|entry| {
                    format!(
                        r#"<tr><td>{date}</td><td>{symptoms}</td><td><span class="badge {tone}">{mood}</span></td><td>{meds}</td><td>{adherence}%</td></tr>"#,
                        date = escape(&entry.display_date()),
                        symptoms = escape(&entry.symptoms.join(", ")),
                        tone = entry.tone.as_str(),
                        mood = escape(&entry.mood),
                        meds = entry.medications,
                        adherence = entry.adherence,
                    )
                })
                .collect();
            if rows.is_empty() {
                fallback("No entries match your search. Try different keywords.")
            } else {
                format!(
                    r#"<table><thead><tr><th>Date</th><th>Symptoms</th><th>Mood</th><th>Medications</th><th>Adherence</th></tr></thead><tbody>{rows}</tbody></table>"#
                )
            }
        }
    };

    let content = format!(
        r#"<form class="search" method="get" action="/history">
  <input name="q" value="{search}" placeholder="Search symptoms, medications..." />
  <button type="submit">Search</button>
</form>
<section class="card">{body}</section>"#,
        search = escape(search),
    );
    render_page(shell, "Health History", &content)
}

pub fn render_analysis(shell: &Shell, state: &ViewState<VoiceAnalysis>) -> String {
    let body = match state {
        ViewState::Loading => loading(),
        ViewState::Failed(message) => fallback(&format!("Failed to fetch analysis: {message}")),
        ViewState::Empty => r#"<section class="card"><h3>No Analysis Available</h3><p class="muted">Start logging your health to see analysis here.</p><a href="/">Go to Dashboard</a></section>"#.to_string(),
        ViewState::Loaded(analysis) => {
            let symptoms: String = analysis
                .symptoms
                .iter()
                .map(|symptom| {
                    format!(
                        r#"<li>{name}<p class="muted">{severity} - {frequency} occurrence(s)</p></li>"#,
                        name = escape(&symptom.name),
                        severity = symptom.severity.label(),
                        frequency = symptom.frequency,
                    )
                })
                .collect();
            let medications: String = analysis
                .medications
                .iter()
                .map(|med| {
                    format!(
                        r#"<li>{}<p class="muted">Mentioned {} time(s)</p></li>"#,
                        escape(&med.name),
                        med.mentions
                    )
                })
                .collect();
            let lifestyle: String = analysis
                .lifestyle
                .iter()
                .map(|line| format!("<li>{}</li>", escape(line)))
                .collect();

            format!(
                r#"<div class="grid">
  <section class="card"><h3>Symptoms Detected</h3><ul>{symptoms}</ul></section>
  <section class="card"><h3>Medications</h3><ul>{medications}</ul></section>
  <section class="card"><h3>Mental &amp; Emotional State</h3><p>Primary Mood: {mood}</p><p class="muted">Tracked {mentions} time(s)</p></section>
  <section class="card"><h3>Lifestyle Context</h3><ul>{lifestyle}</ul></section>
</div>
<section class="card"><h3>Analysis Summary</h3><p>{summary}</p></section>"#,
                mood = escape(&analysis.mood),
                mentions = analysis.mood_mentions,
                summary = escape(&analysis.summary),
            )
        }
    };

    let content = format!(
        r#"<p class="muted">Your voice input converted to structured medical data</p>
{body}"#
    );
    render_page(shell, "Voice Analysis", &content)
}

pub fn render_reports(shell: &Shell) -> String {
    let cards: String = ReportKind::ALL
        .into_iter()
        .filter(|kind| *kind != ReportKind::Summary)
        .map(|kind| {
            format!(
                r#"<section class="card report">
  <h3>{title}</h3>
  <p>{description}</p>
  <p class="muted">Last {days} days</p>
  <form method="post" action="/reports/download">
    <input type="hidden" name="kind" value="{kind}" />
    <select name="format"><option value="pdf">PDF</option><option value="txt">Text</option></select>
    <button type="submit">Download</button>
  </form>
</section>"#,
                title = kind.title(),
                description = kind.description(),
                days = kind.default_days(),
                kind = kind.as_str(),
            )
        })
        .collect();
    render_page(shell, "Reports", &format!(r#"<div class="grid">{cards}</div>"#))
}

pub fn render_settings(shell: &Shell, user_id: &str) -> String {
    let content = format!(
        r#"<section class="card">
  <h3>Profile Settings</h3>
  <div class="avatar">{initials}</div>
  <form method="post" action="/settings/name">
    <label for="name">Display name</label>
    <input id="name" name="name" value="{name}" />
    <button type="submit">Save</button>
  </form>
  <p class="muted">Profile id: <code>{user_id}</code></p>
  <form method="post" action="/settings/logout">
    <button type="submit" class="danger">Sign out</button>
  </form>
</section>"#,
        initials = escape(&shell.initials),
        name = escape(&shell.display_name),
        user_id = escape(user_id),
    );
    render_page(shell, "Settings", &content)
}

fn render_tiles(state: &ViewState<DashboardOverview>) -> String {
    let overview = match state {
        ViewState::Loading => return loading(),
        ViewState::Failed(message) => {
            return fallback(&format!("Failed to fetch dashboard overview: {message}"));
        }
        ViewState::Empty => return fallback("No data yet."),
        ViewState::Loaded(overview) => overview,
    };

    overview_tiles(overview)
        .into_iter()
        .map(|tile| {
            let trend = match tile.trend {
                Some(TileTrend::Up) => r#"<span class="trend up">&#9650;</span>"#,
                Some(TileTrend::Neutral) => r#"<span class="trend">&#8212;</span>"#,
                None => "",
            };
            format!(
                r#"<div class="tile"><p class="label">{label}</p><p class="value">{value}{trend}</p><p class="muted">{subtext}</p></div>"#,
                label = tile.label,
                value = escape(&tile.value),
                subtext = escape(&tile.subtext),
            )
        })
        .collect()
}

fn render_voice(voice: &VoiceSnapshot) -> String {
    let disabled = if voice.state == RecordingState::Processing {
        " disabled"
    } else {
        ""
    };
    let detail = match (&voice.transcript, &voice.last_log) {
        (Some(transcript), _) => format!(
            r#"<p class="muted">You said:</p><p>{}</p>"#,
            escape(transcript)
        ),
        (None, Some(last)) => format!(
            r#"<p class="muted">Last Logged ({}):</p><p>{}</p>"#,
            escape(&last.timestamp),
            escape(&last.summary)
        ),
        (None, None) => String::new(),
    };

    format!(
        r#"<section class="card voice">
  <h3>Log Your Health</h3>
  <p>Record your daily health experiences. We'll automatically organize your symptoms, medications, and insights.</p>
  <form method="post" action="/log">
    <textarea name="prompt" rows="3" placeholder="Enter your health update (or paste voice transcript)"></textarea>
    <button type="submit"{disabled}>Log entry</button>
  </form>
  <p class="status">{status}</p>
  {detail}
</section>"#,
        status = voice.state.status_text(),
    )
}

fn render_insights(state: &ViewState<Insights>) -> String {
    let body = match state {
        ViewState::Loading => loading(),
        ViewState::Failed(message) => fallback(&format!("Failed to fetch insights: {message}")),
        ViewState::Empty => fallback("No insights yet. Log a health update to get started."),
        ViewState::Loaded(insights) => insight_sections(insights)
            .into_iter()
            .map(|section| {
                let items: String = section
                    .items
                    .iter()
                    .map(|item| format!("<li>{}</li>", escape(item)))
                    .collect();
                format!("<h4>{}</h4><ul>{items}</ul>", section.title)
            })
            .collect(),
    };
    format!(r#"<section class="card"><h3>Health Insights</h3>{body}</section>"#)
}

fn render_trends(state: &ViewState<Vec<ChartPoint>>) -> String {
    let body = match state {
        ViewState::Loading => loading(),
        ViewState::Failed(message) => fallback(&format!("Failed to fetch trends: {message}")),
        ViewState::Empty => fallback("No trend data."),
        ViewState::Loaded(points) => {
            let peak = points
                .iter()
                .map(|p| p.symptoms.max(p.medications))
                .max()
                .unwrap_or(0)
                .max(1);
            points
                .iter()
                .map(|point| {
                    format!(
                        r#"<div class="bar" title="{date}"><span class="sym" style="height:{sym}%"></span><span class="med" style="height:{med}%"></span><small>{day}</small></div>"#,
                        date = escape(&point.date),
                        sym = point.symptoms * 100 / peak,
                        med = point.medications * 100 / peak,
                        day = escape(&point.day),
                    )
                })
                .collect()
        }
    };
    format!(
        r#"<section class="card"><h3>Health Trends</h3><div class="chart">{body}</div><p class="legend"><span class="sym"></span>Symptoms <span class="med"></span>Medications</p></section>"#
    )
}

fn render_summary(state: &ViewState<DoctorSummary>) -> String {
    let text = match state {
        ViewState::Loading => "Loading summary...".to_string(),
        ViewState::Failed(_) => FAILED_SUMMARY_TEXT.to_string(),
        ViewState::Empty => NO_SUMMARY_TEXT.to_string(),
        ViewState::Loaded(summary) => summary.summary.clone(),
    };
    format!(
        r#"<section class="card summary">
  <h3>Doctor Summary</h3>
  <pre>{text}</pre>
  <form method="post" action="/reports/download">
    <input type="hidden" name="kind" value="summary" />
    <input type="hidden" name="format" value="pdf" />
    <button type="submit">Export PDF</button>
  </form>
</section>"#,
        text = escape(&text),
    )
}

fn render_page(shell: &Shell, title: &str, content: &str) -> String {
    let nav: String = NAV
        .iter()
        .map(|(href, label)| {
            let class = if *href == shell.active { " class=\"active\"" } else { "" };
            format!(r#"<a href="{href}"{class}>{label}</a>"#)
        })
        .collect();

    let notice = shell
        .notice
        .as_ref()
        .map(|notice| {
            let class = match notice.kind {
                NoticeKind::Success => "success",
                NoticeKind::Error => "error",
            };
            format!(
                r#"<div class="notice {class}"><strong>{}</strong><p>{}</p></div>"#,
                escape(&notice.title),
                escape(&notice.description)
            )
        })
        .unwrap_or_default();

    PAGE_HTML
        .replace("{{TITLE}}", &escape(title))
        .replace("{{NAV}}", &nav)
        .replace("{{USER}}", &escape(&shell.display_name))
        .replace("{{INITIALS}}", &escape(&shell.initials))
        .replace("{{NOTICE}}", &notice)
        .replace("{{CONTENT}}", content)
}

fn loading() -> String {
    r#"<p class="muted loading">Loading...</p>"#.to_string()
}

fn fallback(message: &str) -> String {
    format!(r#"<p class="muted">{}</p>"#, escape(message))
}

pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} · HealthVoice</title>
  <style>
    :root {
      --bg: #f4f7fb;
      --ink: #1f2a37;
      --muted: #6b7280;
      --primary: #2563eb;
      --success: #16a34a;
      --warning: #d97706;
      --danger: #dc2626;
      --card: #ffffff;
      --shadow: 0 10px 30px rgba(31, 42, 55, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      display: grid;
      grid-template-columns: 220px 1fr;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
    }

    aside {
      background: #0f172a;
      color: #e2e8f0;
      padding: 24px 16px;
      display: flex;
      flex-direction: column;
      gap: 8px;
    }

    aside .brand {
      font-weight: 700;
      font-size: 1.2rem;
      margin-bottom: 16px;
    }

    aside a {
      color: inherit;
      text-decoration: none;
      padding: 8px 12px;
      border-radius: 8px;
    }

    aside a.active,
    aside a:hover {
      background: rgba(255, 255, 255, 0.1);
    }

    main {
      padding: 24px 32px 48px;
      display: grid;
      gap: 20px;
      align-content: start;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    h1 {
      margin: 0;
      font-size: 1.6rem;
    }

    .user {
      display: flex;
      align-items: center;
      gap: 10px;
    }

    .avatar {
      width: 36px;
      height: 36px;
      border-radius: 50%;
      display: grid;
      place-items: center;
      background: var(--primary);
      color: #fff;
      font-weight: 600;
    }

    .tiles {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 20px;
    }

    .tile,
    .card {
      background: var(--card);
      border-radius: 14px;
      box-shadow: var(--shadow);
      padding: 18px 20px;
    }

    .tile .label {
      margin: 0;
      color: var(--muted);
      font-size: 0.85rem;
    }

    .tile .value {
      margin: 6px 0;
      font-size: 1.6rem;
      font-weight: 600;
    }

    .trend {
      margin-left: 8px;
      font-size: 0.9rem;
      color: var(--muted);
    }

    .trend.up {
      color: var(--success);
    }

    .muted {
      color: var(--muted);
    }

    .voice {
      background: linear-gradient(135deg, #2563eb, #1d4ed8);
      color: #fff;
    }

    .voice .muted {
      color: rgba(255, 255, 255, 0.75);
    }

    textarea,
    input,
    select {
      width: 100%;
      padding: 10px 12px;
      border-radius: 8px;
      border: 1px solid #d1d5db;
      font: inherit;
      margin: 6px 0;
    }

    button {
      padding: 10px 16px;
      border: 0;
      border-radius: 8px;
      background: var(--primary);
      color: #fff;
      font: inherit;
      cursor: pointer;
    }

    .voice button {
      background: rgba(255, 255, 255, 0.2);
    }

    button:disabled {
      opacity: 0.6;
      cursor: not-allowed;
    }

    button.danger {
      background: var(--danger);
    }

    .chart {
      display: flex;
      align-items: flex-end;
      gap: 12px;
      height: 160px;
    }

    .bar {
      flex: 1;
      height: 100%;
      display: flex;
      align-items: flex-end;
      justify-content: center;
      gap: 3px;
      position: relative;
      padding-bottom: 18px;
    }

    .bar small {
      position: absolute;
      bottom: 0;
      color: var(--muted);
    }

    .bar span {
      width: 12px;
      border-radius: 4px 4px 0 0;
    }

    .sym {
      background: var(--primary);
    }

    .med {
      background: #8b5cf6;
    }

    .legend span {
      display: inline-block;
      width: 10px;
      height: 10px;
      margin: 0 4px 0 12px;
    }

    .summary pre {
      white-space: pre-wrap;
      font-family: inherit;
      background: var(--bg);
      padding: 12px;
      border-radius: 8px;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th,
    td {
      text-align: left;
      padding: 10px 8px;
      border-bottom: 1px solid #e5e7eb;
    }

    .badge {
      padding: 2px 8px;
      border-radius: 999px;
      font-size: 0.8rem;
      background: #f3f4f6;
    }

    .badge.success {
      color: var(--success);
      background: #dcfce7;
    }

    .badge.warning {
      color: var(--warning);
      background: #fef3c7;
    }

    .badge.destructive {
      color: var(--danger);
      background: #fee2e2;
    }

    .search {
      display: flex;
      gap: 10px;
      align-items: center;
    }

    .notice {
      border-radius: 10px;
      padding: 12px 16px;
    }

    .notice p {
      margin: 4px 0 0;
    }

    .notice.success {
      background: #dcfce7;
      color: #14532d;
    }

    .notice.error {
      background: #fee2e2;
      color: #7f1d1d;
    }

    @media (max-width: 720px) {
      body {
        grid-template-columns: 1fr;
      }

      aside {
        flex-direction: row;
        flex-wrap: wrap;
      }
    }
  </style>
</head>
<body>
  <aside>
    <div class="brand">HealthVoice</div>
    {{NAV}}
  </aside>
  <main>
    <header>
      <h1>{{TITLE}}</h1>
      <div class="user"><span>{{USER}}</span><div class="avatar">{{INITIALS}}</div></div>
    </header>
    {{NOTICE}}
    {{CONTENT}}
  </main>
  <script>
    // Reload when any view settles on new data.
    (() => {
      let last = null;
      const poll = async () => {
        try {
          const res = await fetch('/api/views');
          if (!res.ok) return;
          const body = await res.text();
          if (last !== null && body !== last && !document.activeElement.matches('textarea, input')) {
            window.location.reload();
            return;
          }
          last = body;
        } catch (err) {
          console.error('view poll failed', err);
        }
      };
      poll();
      setInterval(poll, 5000);
    })();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::LastLog;

    fn shell() -> Shell {
        Shell {
            active: "/",
            display_name: "Ada <Admin>".to_string(),
            initials: "AA".to_string(),
            notice: Some(Notice::error("Failed to create health log", "bad input")),
        }
    }

    #[test]
    fn escape_handles_markup() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn dashboard_renders_each_view_state() {
        let snapshot = DashboardSnapshot {
            overview: ViewState::Loaded(DashboardOverview::default()),
            insights: ViewState::Failed("HTTP error! status: 502".into()),
            trends: ViewState::Loading,
            history: ViewState::Empty,
            summary: ViewState::Empty,
            analysis: ViewState::Empty,
            voice: VoiceSnapshot {
                state: RecordingState::Idle,
                transcript: None,
                last_log: Some(LastLog {
                    log_id: "log-1".into(),
                    summary: "Mild headache".into(),
                    timestamp: "09:15:00".into(),
                }),
            },
        };

        let html = render_dashboard(&shell(), &snapshot);
        assert!(html.contains("Symptoms Today"));
        assert!(html.contains("Failed to fetch insights: HTTP error! status: 502"));
        assert!(html.contains("Last Logged (09:15:00)"));
        assert!(html.contains(NO_SUMMARY_TEXT));
        assert!(html.contains("Ada &lt;Admin&gt;"));
        assert!(html.contains(r#"<div class="notice error">"#));
        assert!(html.contains(r#"<a href="/" class="active">Dashboard</a>"#));
    }

    #[test]
    fn history_reports_no_matches() {
        let entries = vec![HistoryEntry {
            date: "2026-10-18".into(),
            symptoms: vec!["None".into()],
            mood: "Calm".into(),
            tone: crate::views::MoodTone::Success,
            medications: 1,
            adherence: 100,
        }];
        let state = ViewState::Loaded(entries);

        let html = render_history(&shell(), &state, "calm");
        assert!(html.contains("Oct 18, 2026"));

        let html = render_history(&shell(), &state, "migraine");
        assert!(html.contains("No entries match your search."));
    }

    #[test]
    fn analysis_page_lists_severities() {
        use crate::models::{AnalysisPeriod, Insights, SymptomInsight};

        let insights = Insights {
            symptoms_detected: vec![SymptomInsight {
                symptom: "headache".into(),
                frequency: 4,
                percentage: 100.0,
            }],
            analysis_period: AnalysisPeriod {
                days: 7,
                total_logs: 4,
                ..Default::default()
            },
            ..Default::default()
        };
        let state = ViewState::Loaded(crate::views::voice_analysis(&insights));

        let html = render_analysis(&shell(), &state);
        assert!(html.contains("Frequent - 4 occurrence(s)"));
        assert!(html.contains("Analysis based on 4 health log(s) over the past 7 days."));
        assert!(html.contains(r#"<a href="/analysis">Voice Analysis</a>"#));

        let html = render_analysis(&shell(), &ViewState::Empty);
        assert!(html.contains("No Analysis Available"));
    }
}
