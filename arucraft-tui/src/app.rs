//! Application state and logic

use arucraft_core::guard::HOME_PATH;
use arucraft_core::{
    AccountPermission, GuardDecision, Notification, PanelContext, Route, ServerInfo,
};
use tracing::{debug, warn};

/// Application result for main loop
pub enum AppResult {
    Continue,
    Quit,
}

/// Which pane receives j/k
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Content,
}

/// Main application struct
pub struct App {
    pub ctx: PanelContext,

    /// Pages shown in the sidebar
    pub routes: Vec<Route>,

    /// Route currently displayed
    pub current: Route,

    pub sidebar_cursor: usize,
    pub focus: Focus,

    /// Servers with a profile, as last returned by the refresh
    pub servers: Vec<ServerInfo>,
    pub server_cursor: usize,

    /// Newest toast
    pub status: Option<Notification>,
}

impl App {
    pub fn new(ctx: PanelContext) -> Self {
        Self {
            ctx,
            routes: vec![
                Route::new("servers", HOME_PATH),
                Route::new("profile", "/profile").requires(AccountPermission::User),
                Route::new("admin", "/admin").requires(AccountPermission::Admin),
            ],
            current: Route::start(),
            sidebar_cursor: 0,
            focus: Focus::Sidebar,
            servers: Vec::new(),
            server_cursor: 0,
            status: None,
        }
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.ctx.ui.is_sidebar_collapsed()
    }

    pub fn toggle_sidebar(&mut self) {
        if let Err(e) = self.ctx.ui.toggle_sidebar_collapsed() {
            warn!(error = %e, "Could not save sidebar state");
        }
    }

    /// Pull the newest toast out of the dispatcher queue
    pub fn tick(&mut self) {
        if let Some(latest) = self.ctx.notifications.drain().pop() {
            self.status = Some(latest);
        }
    }

    /// Reload the server list and profiles
    pub async fn refresh(&mut self, force: bool) {
        match self.ctx.refresh_servers(force).await {
            Ok(servers) => {
                debug!(count = servers.len(), "Server list refreshed");
                self.servers = servers;
                self.server_cursor = self.server_cursor.min(self.servers.len().saturating_sub(1));
            }
            Err(e) => warn!(error = %e, "Server refresh failed"),
        }
        self.tick();
    }

    /// Reload the logged-in player, which decides the reachable pages
    pub async fn refresh_player(&mut self) {
        if let Err(e) = self.ctx.refresh_player().await {
            warn!(error = %e, "Player refresh failed");
        }
        self.tick();
    }

    pub async fn refresh_versions(&mut self) {
        if let Err(e) = self.ctx.refresh_minecraft_versions().await {
            warn!(error = %e, "Version manifest unavailable");
        }
        self.tick();
    }

    /// Navigate to the route under the sidebar cursor
    pub fn open_selected(&mut self) {
        if let Some(to) = self.routes.get(self.sidebar_cursor).cloned() {
            self.navigate(to);
        }
    }

    pub fn navigate(&mut self, to: Route) {
        match self.ctx.guard(&to, &self.current) {
            GuardDecision::Allow => self.current = to,
            GuardDecision::Redirect(path) => {
                if let Some(home) = self.routes.iter().find(|r| r.full_path == path) {
                    self.current = home.clone();
                }
            }
            GuardDecision::Abort(reason) => {
                self.status = Some(Notification::error("导航", reason));
            }
        }
    }

    pub fn move_down(&mut self) {
        match self.focus {
            Focus::Sidebar => {
                if self.sidebar_cursor + 1 < self.routes.len() {
                    self.sidebar_cursor += 1;
                }
            }
            Focus::Content => {
                if self.server_cursor + 1 < self.servers.len() {
                    self.server_cursor += 1;
                }
            }
        }
    }

    pub fn move_up(&mut self) {
        match self.focus {
            Focus::Sidebar => self.sidebar_cursor = self.sidebar_cursor.saturating_sub(1),
            Focus::Content => self.server_cursor = self.server_cursor.saturating_sub(1),
        }
    }

    pub fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Sidebar => Focus::Content,
            Focus::Content => Focus::Sidebar,
        };
    }

    pub fn selected_server(&self) -> Option<&ServerInfo> {
        self.servers.get(self.server_cursor)
    }
}
