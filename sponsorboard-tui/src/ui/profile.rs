use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};
use sponsorboard_core::model::profile::{UserProfile, or_na};

use super::format::spinner;
use super::theme::Theme;

/// 用户详情页状态
pub struct ProfileState {
    pub id: i64,
    /// 列表中的用户名，详情未到达前用作标题
    pub username: String,
    pub profile: Option<UserProfile>,
    pub loading: bool,
    pub failed: bool,
}

impl ProfileState {
    pub fn new(id: i64, username: String) -> Self {
        Self {
            id,
            username,
            profile: None,
            loading: true,
            failed: false,
        }
    }

    pub fn profile_url(&self) -> Option<&str> {
        self.profile.as_ref()?.profile_url.as_deref()
    }
}

const ACTIVITY_SERIES: [&str; 4] = ["Commits", "Issues", "Pull Requests", "Code Reviews"];

fn labeled(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label:<20}"), Theme::secondary()),
        Span::styled(value, Theme::title()),
    ])
}

fn identity_lines(profile: &UserProfile) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("  {}", profile.display_name()),
            Theme::highlight(),
        )),
        Line::from(Span::styled(
            format!("  {}", profile.username.clone().unwrap_or_default()),
            Theme::secondary(),
        )),
        Line::from(""),
    ];
    if let Some(bio) = profile.bio.as_deref().filter(|b| !b.is_empty()) {
        lines.push(Line::from(format!("  {bio}")));
        lines.push(Line::from(""));
    }

    let optional = [
        ("Company", profile.company.as_ref()),
        ("Location", profile.location.as_ref()),
        ("Email", profile.email.as_ref()),
        ("GitHub", profile.profile_url.as_ref()),
        ("Twitter", profile.twitter_username.as_ref()),
    ];
    for (label, value) in optional {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            lines.push(Line::from(vec![
                Span::styled(format!("  {label}: "), Theme::secondary()),
                Span::raw(v.clone()),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!("  {}", or_na(profile.followers)), Theme::title()),
        Span::styled(" followers · ", Theme::secondary()),
        Span::styled(or_na(profile.following), Theme::title()),
        Span::styled(" following", Theme::secondary()),
    ]));
    lines
}

fn stats_lines(profile: &UserProfile) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled("  User Activity Statistics", Theme::title())),
        labeled("Total Commits", or_na(profile.total_commits)),
        labeled("Total Issues", or_na(profile.total_issues)),
        labeled("Total PRs", or_na(profile.total_pull_requests)),
        labeled("Total Reviews", or_na(profile.total_reviews)),
        Line::from(""),
        Line::from(Span::styled("  Sponsorship Statistics", Theme::title())),
        labeled("Total User Sponsors", or_na(profile.total_sponsors)),
        labeled("Total Users Sponsoring", or_na(profile.total_sponsoring)),
    ]
}

fn activity_chart(profile: &UserProfile) -> BarChart<'static> {
    let mut chart = BarChart::default().bar_width(2).bar_gap(0).group_gap(2);
    for year in profile.activity_by_year() {
        let d = &year.activity_data;
        let values = [d.commits, d.issues, d.pull_requests, d.reviews];
        let bars: Vec<Bar> = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                Bar::default()
                    .value(*v)
                    .text_value(String::new())
                    .style(Style::default().fg(Theme::chart_color(i)))
            })
            .collect();
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(year.year.to_string()))
                .bars(&bars),
        );
    }
    chart
}

fn legend() -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for (i, name) in ACTIVITY_SERIES.iter().enumerate() {
        spans.push(Span::styled("■ ", Style::default().fg(Theme::chart_color(i))));
        spans.push(Span::styled(format!("{name}  "), Theme::secondary()));
    }
    Line::from(spans)
}

pub fn render(frame: &mut Frame, area: Rect, state: &ProfileState, tick: u16) {
    let border = Style::default().fg(Color::DarkGray);

    let Some(profile) = state.profile.as_ref() else {
        let text = if state.failed {
            Span::styled("  Failed to load user", Theme::error())
        } else {
            Span::styled(format!("  Loading {}", spinner(tick)), Theme::secondary())
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(format!(" {} ", state.username), Theme::title()));
        frame.render_widget(
            Paragraph::new(vec![Line::from(""), Line::from(text)]).block(block),
            area,
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[0]);

    let identity = Paragraph::new(identity_lines(profile))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(Span::styled(" Profile ", Theme::title()))
                .title_bottom(Span::styled(" Esc back · o open ", Theme::secondary())),
        );
    frame.render_widget(identity, top[0]);

    let stats = Paragraph::new(stats_lines(profile)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(" Statistics ", Theme::title())),
    );
    frame.render_widget(stats, top[1]);

    let chart_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(" Yearly Activity ", Theme::title()));
    let inner = chart_block.inner(rows[1]);
    frame.render_widget(chart_block, rows[1]);

    if profile.yearly_activity_data.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("  No activity data", Theme::secondary())),
            inner,
        );
        return;
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(44)])
        .split(inner);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(cols[0]);
    frame.render_widget(Paragraph::new(legend()), parts[0]);
    frame.render_widget(activity_chart(profile), parts[1]);
    frame.render_widget(activity_table(profile), cols[1]);
}

fn activity_table(profile: &UserProfile) -> Table<'static> {
    let header = Row::new(["Year", "Commits", "Issues", "PRs", "Reviews"].map(|h| {
        Cell::from(h).style(Theme::header_cell())
    }));
    let rows: Vec<Row> = profile
        .activity_by_year()
        .into_iter()
        .map(|y| {
            let d = &y.activity_data;
            Row::new([
                y.year.to_string(),
                d.commits.to_string(),
                d.issues.to_string(),
                d.pull_requests.to_string(),
                d.reviews.to_string(),
            ])
        })
        .collect();
    Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .column_spacing(1)
}
