//! Terminal UI rendering with ratatui

use arucraft_core::avatar::avatar_src;
use arucraft_core::models::ServerStatus;
use arucraft_core::NotificationColor;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::{App, Focus};

const SIDEBAR_WIDTH: u16 = 18;
const SIDEBAR_COLLAPSED_WIDTH: u16 = 4;

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(1),    // Sidebar + page
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    let sidebar_width = if app.sidebar_collapsed() {
        SIDEBAR_COLLAPSED_WIDTH
    } else {
        SIDEBAR_WIDTH
    };
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(1)])
        .split(rows[1]);

    draw_title_bar(f, app, rows[0]);
    draw_sidebar(f, app, columns[0]);
    match app.current.name.as_deref() {
        Some("profile") => draw_profile(f, app, columns[1]),
        Some("admin") => draw_admin(f, app, columns[1]),
        _ => draw_servers(f, app, columns[1]),
    }
    draw_status_bar(f, app, rows[2]);
}

fn draw_title_bar(f: &mut Frame, app: &App, area: Rect) {
    let (who, color) = match app.ctx.session.user() {
        Some(user) => (
            format!(" {} [{}]", user.player.name, user.permission.label()),
            Color::Green,
        ),
        None if app.ctx.session.is_authenticated() => (" 已登录".to_string(), Color::Green),
        None => (" 未登录".to_string(), Color::Yellow),
    };

    let title_bar = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" aruCraftR {} ", app.current.full_path),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(who, Style::default().fg(color)),
    ]))
    .style(Style::default().bg(Color::DarkGray));

    f.render_widget(title_bar, area);
}

fn draw_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let collapsed = app.sidebar_collapsed();
    let items: Vec<ListItem> = app
        .routes
        .iter()
        .enumerate()
        .map(|(i, route)| {
            let name = route.name.as_deref().unwrap_or("?");
            let label = match (collapsed, name) {
                (true, _) => name.chars().next().unwrap_or('?').to_uppercase().to_string(),
                (false, "servers") => "服务器".to_string(),
                (false, "profile") => "个人资料".to_string(),
                (false, "admin") => "管理".to_string(),
                (false, other) => other.to_string(),
            };

            let mut style = Style::default();
            if route.full_path == app.current.full_path {
                style = style.add_modifier(Modifier::BOLD);
            }
            if i == app.sidebar_cursor && app.focus == Focus::Sidebar {
                style = style.bg(Color::Blue).fg(Color::White);
            }
            ListItem::new(Line::from(Span::styled(label, style)))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::RIGHT));
    f.render_widget(list, area);
}

fn draw_servers(f: &mut Frame, app: &App, area: Rect) {
    if app.servers.is_empty() {
        let hint = if app.ctx.cache.is_server_list_loaded {
            "没有可显示的服务器"
        } else {
            "按 r 加载服务器列表"
        };
        f.render_widget(
            Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = app
        .servers
        .iter()
        .enumerate()
        .map(|(i, server)| {
            let profile = app.ctx.local.profile(&server.id);
            let name = profile
                .and_then(|p| p.display_name())
                .unwrap_or(server.id.as_str());
            let version = profile
                .and_then(|p| p.mc_version.as_deref())
                .unwrap_or("-");

            let line = format!(
                "{:<24} {:<8} {:>3}/{:<3} {}",
                name,
                server.status.label(),
                server.player_count,
                server.max_players,
                version
            );

            let mut style = Style::default().fg(status_color(server.status));
            if i == app.server_cursor && app.focus == Focus::Content {
                style = style.bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD);
            }
            ListItem::new(Line::from(Span::styled(line, style)))
        })
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(4)])
        .split(area);

    f.render_widget(List::new(items), chunks[0]);

    let announcement = app
        .selected_server()
        .and_then(|s| app.ctx.local.profile(&s.id))
        .and_then(|p| p.announcement.clone())
        .unwrap_or_default();
    f.render_widget(
        Paragraph::new(announcement)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::TOP).title("公告")),
        chunks[1],
    );
}

fn draw_profile(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    match app.ctx.session.user() {
        Some(user) => {
            lines.push(Line::from(format!("玩家: {}", user.player.name)));
            lines.push(Line::from(format!("UUID: {}", user.player.uuid)));
            lines.push(Line::from(format!("头像: {}", avatar_src(&user.player))));
            lines.push(Line::from(format!("权限: {}", user.permission.label())));
        }
        None => lines.push(Line::from("未获取到玩家信息")),
    }

    if let Some(profile) = &app.ctx.cache.player_profile {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("在线QQ后缀: {}", profile.online_qq_suffix)));
        lines.push(Line::from(format!("离线QQ后缀: {}", profile.offline_qq_suffix)));
        if let Some(qq) = &profile.social_accounts.qq {
            lines.push(Line::from(format!("QQ: {}", qq)));
        }
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn draw_admin(f: &mut Frame, app: &App, area: Rect) {
    let cache = &app.ctx.cache;
    let mut lines = vec![
        Line::from(format!("隐藏的服务器: {}", cache.hidden_servers.len())),
        Line::from(format!("已缓存资料: {}", app.ctx.local.server_profiles().len())),
        Line::from(""),
    ];

    if cache.mc_release_list.is_empty() {
        lines.push(Line::from(Span::styled(
            "按 v 加载 Minecraft 版本列表",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        let latest = |list: &[String]| list.first().cloned().unwrap_or_default();
        lines.push(Line::from(format!(
            "正式版: {} 个 (最新 {})",
            cache.mc_release_list.len(),
            latest(&cache.mc_release_list[..])
        )));
        lines.push(Line::from(format!(
            "快照: {} 个 (最新 {})",
            cache.mc_snapshot_list.len(),
            latest(&cache.mc_snapshot_list[..])
        )));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match &app.status {
        Some(toast) => {
            let color = match toast.color {
                NotificationColor::Error => Color::Red,
                NotificationColor::Warning => Color::Yellow,
                NotificationColor::Success => Color::Green,
                NotificationColor::Info | NotificationColor::Primary => Color::Blue,
                NotificationColor::Neutral | NotificationColor::Secondary => Color::Gray,
            };
            (
                format!("{}: {}", toast.title, toast.description),
                Style::default().fg(color),
            )
        }
        None => (
            "j↓ k↑ h/l:切换面板 │ Enter:打开 Tab:侧边栏 │ r:刷新 v:版本 c:清除 │ q:退出".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    };

    f.render_widget(Paragraph::new(text).style(style), area);
}

fn status_color(status: ServerStatus) -> Color {
    match status {
        ServerStatus::Active => Color::Green,
        ServerStatus::Starting | ServerStatus::Stopping => Color::Yellow,
        ServerStatus::Stopped => Color::Gray,
        ServerStatus::Unresponsive => Color::Red,
    }
}
